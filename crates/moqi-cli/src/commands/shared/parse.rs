use std::str::FromStr;

use anyhow::Context;
use chrono::{DateTime, Utc};

/// Parse a value through its `FromStr` impl, naming the field on failure.
pub fn parse_value<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Split `KEY=VALUE` entries and parse each value.
pub fn parse_assignments<T>(entries: &[String], field: &str) -> anyhow::Result<Vec<(String, T)>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    entries
        .iter()
        .map(|entry| {
            let (key, value) = entry
                .split_once('=')
                .with_context(|| format!("invalid {field} '{entry}': expected STARTUP=VALUE"))?;
            let key = key.trim();
            if key.is_empty() {
                anyhow::bail!("invalid {field} '{entry}': missing startup id");
            }
            Ok((key.to_string(), parse_value(value, field)?))
        })
        .collect()
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(raw: &str, field: &str) -> anyhow::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

#[cfg(test)]
mod tests {
    use moqi_core::enums::{Decision, FeedbackPreference};
    use pretty_assertions::assert_eq;

    use super::{parse_assignments, parse_timestamp, parse_value};

    #[test]
    fn parses_decision_aliases() {
        let decision: Decision = parse_value("l", "decision").expect("decision should parse");
        assert_eq!(decision, Decision::Like);
        let decision: Decision = parse_value(" no ", "decision").expect("decision should parse");
        assert_eq!(decision, Decision::Dislike);
    }

    #[test]
    fn errors_on_invalid_decision() {
        let err = parse_value::<Decision>("maybe", "decision").expect_err("should fail");
        assert!(err.to_string().contains("invalid decision 'maybe'"));
    }

    #[test]
    fn parses_feedback_assignments() {
        let parsed: Vec<(String, FeedbackPreference)> =
            parse_assignments(&["stu-a=group".into(), "stu-b=no".into()], "feedback")
                .expect("feedback should parse");
        assert_eq!(
            parsed,
            vec![
                ("stu-a".to_string(), FeedbackPreference::Group),
                ("stu-b".to_string(), FeedbackPreference::No),
            ]
        );
    }

    #[test]
    fn parses_coin_assignments() {
        let parsed: Vec<(String, u32)> =
            parse_assignments(&["stu-a=30".into()], "allocation").expect("coins should parse");
        assert_eq!(parsed, vec![("stu-a".to_string(), 30)]);
    }

    #[test]
    fn rejects_assignment_without_equals() {
        let err = parse_assignments::<u32>(&["stu-a".into()], "allocation").expect_err("should fail");
        assert!(err.to_string().contains("expected STARTUP=VALUE"));
    }

    #[test]
    fn rejects_negative_coins() {
        assert!(parse_assignments::<u32>(&["stu-a=-10".into()], "allocation").is_err());
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts = parse_timestamp("2026-03-01T10:00:00+02:00", "from").expect("should parse");
        assert_eq!(ts.to_rfc3339(), "2026-03-01T08:00:00+00:00");
    }
}
