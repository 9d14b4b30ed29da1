//! Timestamp utilities

use chrono::{DateTime, Local};

/// Format used for the `segmented_at` column of upload records
pub const RECORD_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Get current local timestamp
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Render a timestamp the way upload records store it
pub fn record_timestamp(at: DateTime<Local>) -> String {
    at.format(RECORD_TIMESTAMP_FORMAT).to_string()
}
