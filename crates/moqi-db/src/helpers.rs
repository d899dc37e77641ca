//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed entity structs.
//! These helpers isolate the parsing logic and handle the dual datetime format
//! issue (`SQLite`'s `datetime('now')` vs Rust's `to_rfc3339()`).

use chrono::{DateTime, Utc};

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all moqi-core enums that use `#[serde(rename_all = "snake_case")]`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read a nullable INTEGER column and narrow it to `T`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the stored value does not fit in `T`.
pub fn get_opt_int<T: TryFrom<i64>>(
    row: &libsql::Row,
    idx: i32,
) -> Result<Option<T>, DatabaseError> {
    row.get::<Option<i64>>(idx)?
        .map(|v| {
            T::try_from(v)
                .map_err(|_| DatabaseError::Query(format!("Integer {v} out of range in column {idx}")))
        })
        .transpose()
}

/// Read a NOT NULL INTEGER column and narrow it to `T`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the stored value does not fit in `T`.
pub fn get_int<T: TryFrom<i64>>(row: &libsql::Row, idx: i32) -> Result<T, DatabaseError> {
    let v = row.get::<i64>(idx)?;
    T::try_from(v).map_err(|_| DatabaseError::Query(format!("Integer {v} out of range in column {idx}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use moqi_core::enums::FeedbackPreference;

    #[test]
    fn parses_rfc3339_and_sqlite_formats() {
        let a = parse_datetime("2026-02-09T14:30:00+00:00").unwrap();
        let b = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_garbage_datetime() {
        assert!(matches!(parse_datetime("yesterday"), Err(DatabaseError::Query(_))));
    }

    #[test]
    fn parses_feedback_enum() {
        let pref: FeedbackPreference = parse_enum("group").unwrap();
        assert_eq!(pref, FeedbackPreference::Group);
        assert!(parse_enum::<FeedbackPreference>("individual").is_err());
    }
}
