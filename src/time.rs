// src/time.rs

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use std::time::SystemTime;

use crate::error::DateError;

/// Parses a timestamp string found in a mock payload.
/// Handles RFC 3339 / ISO 8601, the weaker space-separated or zone-less form,
/// and plain `YYYY-MM-DD` dates (read as UTC midnight).
pub fn parse_timestamp(ts_str: &str) -> Result<DateTime<Utc>, DateError> {
    let trimmed = ts_str.trim();

    // Strict RFC 3339 first, keeps any explicit offset
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.with_timezone(&Utc));
    }

    // "2024-08-07 10:00:00" or "2024-08-07T10:00:00" without a zone
    if let Ok(system_time) = humantime::parse_rfc3339_weak(trimmed) {
        return Ok(system_time.into());
    }

    // Date-only strings are UTC midnight
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    Err(DateError::InvalidTimestamp(ts_str.to_string()))
}

/// Formats an instant the way payloads store it: `2024-08-07T00:00:00.000Z`.
pub fn format_timestamp(datetime: &DateTime<Utc>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The current instant in payload format.
pub fn now_timestamp() -> String {
    humantime::format_rfc3339_millis(SystemTime::now()).to_string()
}
