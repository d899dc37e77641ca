/// Cells wider than this are truncated with an ellipsis.
const MAX_CELL_WIDTH: usize = 48;

/// Render an aligned plain-text table. Numeric cells are right-aligned.
#[must_use]
pub fn render_rows(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.chars().count())
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| format_cell(&truncate(header, *width), *width, false))
        .collect::<Vec<_>>()
        .join("  ");
    let divider = "-".repeat(header_line.trim_end().chars().count());

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line.trim_end().to_string());
    lines.push(divider);
    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let cell = row.get(index).map_or("-", String::as_str);
                let text = truncate(cell, *width);
                let numeric = looks_numeric(&text);
                format_cell(&text, *width, numeric)
            })
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn looks_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit())
}

fn format_cell(value: &str, width: usize, right_align: bool) -> String {
    if right_align {
        format!("{value:>width$}")
    } else {
        format!("{value:<width$}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::render_rows;

    #[test]
    fn aligns_mixed_widths() {
        let rows = vec![
            vec!["stu-1".to_string(), "70".to_string()],
            vec!["stu-200".to_string(), "5".to_string()],
        ];
        let table = render_rows(&["startup", "coins"], &rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "startup  coins");
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2], "stu-1       70");
        assert_eq!(lines[3], "stu-200      5");
    }

    #[test]
    fn long_cells_are_truncated() {
        let rows = vec![vec!["x".repeat(100)]];
        let table = render_rows(&["tagline"], &rows);
        let last = table.lines().last().unwrap_or_default();
        assert_eq!(last.chars().count(), 48);
        assert!(last.ends_with('…'));
    }
}
