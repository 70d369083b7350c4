//! Date/time helpers for stored timestamps.

use chrono::{DateTime, Utc};

/// Storage format for timestamps (UTC, second precision).
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a UTC datetime in the storage format.
pub fn to_storage_string(dt: &DateTime<Utc>) -> String {
    dt.format(STORAGE_FORMAT).to_string()
}

/// Current UTC time in the storage format.
pub fn now_storage_string() -> String {
    to_storage_string(&Utc::now())
}

/// Convert a stored timestamp (YYYY-MM-DD HH:MM:SS, UTC) to RFC3339.
///
/// Values that are not in the storage format are returned unchanged.
pub fn to_rfc3339(datetime_str: &str) -> String {
    match chrono::NaiveDateTime::parse_from_str(datetime_str, STORAGE_FORMAT) {
        Ok(naive) => naive.and_utc().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        Err(_) => datetime_str.to_string(),
    }
}
