//! DateTime utilities.
//!
//! Helpers for the timestamps that drive the case lifecycle. Clients send
//! dates in a handful of ISO-ish shapes; [`parse_datetime`] accepts them all
//! and normalizes to UTC.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Get the current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Parse a datetime string into a UTC DateTime.
///
/// Supports multiple common formats:
/// - ISO 8601 (RFC 3339): "2025-03-01T12:30:45Z"
/// - ISO 8601 with offset: "2025-03-01T12:30:45+02:00"
/// - Naive datetime (assumed UTC): "2025-03-01 12:30:45"
///
/// # Examples
///
/// ```
/// use caseflow_common::datetime::parse_datetime;
///
/// let dt = parse_datetime("2025-03-01T12:30:45Z").expect("Failed to parse");
/// println!("Parsed: {}", dt);
/// ```
pub fn parse_datetime(datetime_str: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(datetime_str)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%d %H:%M:%S")
                .map(|ndt| DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc))
        })
        .or_else(|_| {
            NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%dT%H:%M:%S")
                .map(|ndt| DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc))
        })
        .map_err(|e| format!("Failed to parse datetime '{}': {}", datetime_str, e))
}

/// Format a DateTime as an ISO 8601 / RFC 3339 string.
pub fn format_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.to_rfc3339()
}

/// Format a DateTime for display in notification messages.
pub fn format_datetime_display(datetime: &DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Duration between two datetimes, in whole minutes.
///
/// Negative when `end` precedes `start`; worklog aggregation treats that as
/// an input error upstream.
pub fn duration_minutes(start: &DateTime<Utc>, end: &DateTime<Utc>) -> i64 {
    (*end - *start).num_minutes()
}
