//! Row-to-entity parsing helpers.
//!
//! Every repo needs to convert `libsql::Row` (column-indexed) into typed entity
//! structs. These helpers isolate the parsing logic and handle the dual datetime
//! format issue (`SQLite`'s `datetime('now')` vs Rust's `to_rfc3339()`).

use chrono::{DateTime, Utc};

use aula_core::enums::Semester;

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

/// Parse an INTEGER column as a [`Semester`].
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the value is outside 1-10.
pub fn parse_semester(n: i64) -> Result<Semester, DatabaseError> {
    let n = u8::try_from(n)
        .map_err(|_| DatabaseError::Query(format!("semester out of range: {n}")))?;
    Semester::try_from(n).map_err(DatabaseError::Query)
}

/// Parse a TEXT column holding a JSON string array (e.g., prerequisites).
///
/// Empty string and SQL NULL both parse as an empty list.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string is not a JSON string array.
pub fn parse_string_list(s: Option<&str>) -> Result<Vec<String>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => serde_json::from_str(s)
            .map_err(|e| DatabaseError::Query(format!("Invalid JSON list in column: {e}"))),
        _ => Ok(Vec::new()),
    }
}

/// Serialize a string list back into the TEXT column format.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if serialization fails (it cannot for string
/// slices, but the signature keeps call sites uniform).
pub fn to_string_list(items: &[String]) -> Result<String, DatabaseError> {
    serde_json::to_string(items)
        .map_err(|e| DatabaseError::Query(format!("Failed to encode JSON list: {e}")))
}

/// Whether a libSQL error is a UNIQUE constraint violation.
///
/// libSQL surfaces constraint failures as `SqliteFailure` with the message
/// embedded; string matching is the stable way to detect them.
#[must_use]
pub fn is_unique_violation(err: &libsql::Error) -> bool {
    err.to_string().contains("UNIQUE constraint failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_rfc3339() {
        let dt = parse_datetime("2026-02-09T14:30:00+00:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-02-09T14:30:00+00:00");
    }

    #[test]
    fn parses_sqlite_default_format() {
        let dt = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-02-09T14:30:00+00:00");
    }

    #[test]
    fn rejects_garbage_datetime() {
        assert!(parse_datetime("not a date").is_err());
    }

    #[test]
    fn string_list_roundtrip() {
        let items = vec!["sub-1".to_string(), "sub-2".to_string()];
        let encoded = to_string_list(&items).unwrap();
        assert_eq!(parse_string_list(Some(&encoded)).unwrap(), items);
    }

    #[test]
    fn string_list_empty_cases() {
        assert!(parse_string_list(None).unwrap().is_empty());
        assert!(parse_string_list(Some("")).unwrap().is_empty());
        assert!(parse_string_list(Some("[]")).unwrap().is_empty());
    }

    #[test]
    fn semester_bounds() {
        assert!(parse_semester(5).is_ok());
        assert!(parse_semester(0).is_err());
        assert!(parse_semester(11).is_err());
        assert!(parse_semester(-1).is_err());
    }
}
