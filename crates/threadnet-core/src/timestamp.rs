//! Timestamp interpretation shared by the loader and the temporal builder.
//!
//! Numeric cells are UNIX seconds (UTC). Text cells are accepted in the
//! loader's own output format (`%Y-%m-%d %H:%M:%S`), ISO-8601 with a `T`
//! separator, RFC 3339 with an offset (converted to UTC), or a bare date.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::table::Value;

/// Rendering used for derived `<column>_UTC` columns.
pub const UTC_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Marker error: the cell holds something that is not a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTimestamp;

/// Convert UNIX seconds to a naive UTC datetime.
#[must_use]
pub fn from_unix_seconds(secs: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
}

/// Interpret a numeric cell as UNIX seconds.
///
/// Returns `Ok(None)` for null cells.
///
/// # Errors
///
/// Returns [`InvalidTimestamp`] for non-numeric or out-of-range cells.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_unix(value: &Value) -> Result<Option<NaiveDateTime>, InvalidTimestamp> {
    match value {
        Value::Null => Ok(None),
        Value::Int(secs) => from_unix_seconds(*secs).map(Some).ok_or(InvalidTimestamp),
        Value::Float(f) => {
            let secs = f.floor();
            let nanos = ((f - secs) * 1e9).round() as u32;
            DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
                .map(|dt| Some(dt.naive_utc()))
                .ok_or(InvalidTimestamp)
        }
        _ => Err(InvalidTimestamp),
    }
}

/// Interpret a cell as a timestamp: UNIX seconds or a datetime string.
///
/// Returns `Ok(None)` for null cells.
///
/// # Errors
///
/// Returns [`InvalidTimestamp`] when the cell cannot be interpreted.
pub fn parse_timestamp(value: &Value) -> Result<Option<NaiveDateTime>, InvalidTimestamp> {
    match value {
        Value::Text(s) => parse_text(s.trim()).map(Some).ok_or(InvalidTimestamp),
        other => parse_unix(other),
    }
}

fn parse_text(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(s, UTC_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
