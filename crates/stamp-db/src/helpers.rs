//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed entities and
//! binds audit fields as parameters. These helpers isolate that work and handle
//! the dual datetime format issue (`SQLite`'s `datetime('now')` vs Rust's
//! `to_rfc3339()`).

use chrono::{DateTime, Utc};
use stamp_core::{ActingIdentity, AuditFields};

use crate::error::DatabaseError;

/// Columns holding the audit fields, in bind/read order.
pub const AUDIT_COLS: &str = "creator, date_created, changed_by, date_changed";

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

/// Parse an optional TEXT column holding a stored acting identity.
///
/// # Errors
///
/// Returns `DatabaseError::Core` if a non-empty string is not a stored identity.
pub fn parse_optional_identity(s: Option<&str>) -> Result<Option<ActingIdentity>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(s.parse()?)),
        _ => Ok(None),
    }
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

/// Read the four audit columns starting at `first`, in [`AUDIT_COLS`] order.
///
/// # Errors
///
/// Returns `DatabaseError` if a column cannot be read or parsed.
pub fn row_to_audit(row: &libsql::Row, first: i32) -> Result<AuditFields, DatabaseError> {
    Ok(AuditFields {
        creator: parse_optional_identity(get_opt_string(row, first)?.as_deref())?,
        date_created: parse_optional_datetime(get_opt_string(row, first + 1)?.as_deref())?,
        changed_by: parse_optional_identity(get_opt_string(row, first + 2)?.as_deref())?,
        date_changed: parse_optional_datetime(get_opt_string(row, first + 3)?.as_deref())?,
    })
}

fn stored_text(s: Option<String>) -> libsql::Value {
    s.map_or(libsql::Value::Null, libsql::Value::Text)
}

/// Bind values for the four audit columns, in [`AUDIT_COLS`] order.
#[must_use]
pub fn audit_values(audit: &AuditFields) -> [libsql::Value; 4] {
    let [changed_by, date_changed] = changed_values(audit);
    [
        stored_text(audit.creator.as_ref().map(ActingIdentity::as_stored)),
        stored_text(audit.date_created.map(|d| d.to_rfc3339())),
        changed_by,
        date_changed,
    ]
}

/// Bind values for `changed_by, date_changed`. Updates write only these two;
/// `creator` and `date_created` are fixed by the insert.
#[must_use]
pub fn changed_values(audit: &AuditFields) -> [libsql::Value; 2] {
    [
        stored_text(audit.changed_by.as_ref().map(ActingIdentity::as_stored)),
        stored_text(audit.date_changed.map(|d| d.to_rfc3339())),
    ]
}

/// Bind value for a nullable TEXT column.
#[must_use]
pub fn opt_text(value: Option<&str>) -> libsql::Value {
    value.map_or(libsql::Value::Null, |s| libsql::Value::Text(s.to_string()))
}

/// Bind value for a nullable REAL column.
#[must_use]
pub fn opt_real(value: Option<f64>) -> libsql::Value {
    value.map_or(libsql::Value::Null, libsql::Value::Real)
}
