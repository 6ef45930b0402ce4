//! Row-to-record parsing helpers.
//!
//! Every repo needs to convert `libsql::Row` (column-indexed) into typed
//! records. These helpers isolate the parsing logic: RFC 3339 vs `SQLite`
//! datetimes, decimals stored as TEXT, and id sets stored as JSON arrays.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

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

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a TEXT column holding a decimal.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string is not a decimal number.
pub fn parse_decimal(s: &str) -> Result<Decimal, DatabaseError> {
    Decimal::from_str(s)
        .map_err(|e| DatabaseError::Query(format!("Failed to parse decimal '{s}': {e}")))
}

/// Parse a nullable decimal TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string is not a decimal number.
pub fn parse_optional_decimal(s: Option<&str>) -> Result<Option<Decimal>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_decimal(s)?)),
        _ => Ok(None),
    }
}

/// Parse a JSON array of ids.
///
/// # Errors
///
/// Returns `DatabaseError::Json` if the column is not a JSON string array.
pub fn parse_id_set(s: &str) -> Result<BTreeSet<String>, DatabaseError> {
    Ok(serde_json::from_str(s)?)
}

/// Encode an id set as a JSON array.
///
/// # Errors
///
/// Returns `DatabaseError::Json` if encoding fails.
pub fn encode_id_set(ids: &BTreeSet<String>) -> Result<String, DatabaseError> {
    Ok(serde_json::to_string(ids)?)
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// You must use `get::<Option<String>>()` for nullable columns.
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

/// Bind an optional value as TEXT, or SQL NULL when absent.
pub fn text_or_null<T: ToString>(value: Option<T>) -> libsql::Value {
    value.map_or(libsql::Value::Null, |v| libsql::Value::Text(v.to_string()))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parses_both_datetime_formats() {
        let rfc = parse_datetime("2024-03-01T10:00:00Z").unwrap();
        let sqlite = parse_datetime("2024-03-01 10:00:00").unwrap();
        assert_eq!(rfc, sqlite);
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn empty_optional_columns_are_none() {
        assert_eq!(parse_optional_datetime(Some("")).unwrap(), None);
        assert_eq!(parse_optional_decimal(None).unwrap(), None);
        assert_eq!(parse_optional_decimal(Some("12.50")).unwrap(), Some(dec!(12.50)));
    }

    #[test]
    fn absent_values_bind_as_null() {
        assert!(matches!(text_or_null(None::<Decimal>), libsql::Value::Null));
        assert!(matches!(
            text_or_null(Some(dec!(1.50))),
            libsql::Value::Text(ref s) if s == "1.50"
        ));
    }

    #[test]
    fn id_sets_roundtrip_through_json() {
        let ids = BTreeSet::from(["u-2".to_string(), "u-1".to_string()]);
        let encoded = encode_id_set(&ids).unwrap();
        assert_eq!(encoded, r#"["u-1","u-2"]"#);
        assert_eq!(parse_id_set(&encoded).unwrap(), ids);
    }
}
