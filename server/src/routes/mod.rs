//! HTTP routes, organized by domain:
//! - `elements`: ingestion, status, details and the queue
//! - `ai`: generation from inspiration images and provider status
//! - `code`: improved code for a stored element
//! - `quick_fix`: rule-based styling tips

pub mod ai;
pub mod code;
pub mod elements;
pub mod quick_fix;

use chrono::DateTime;

/// Milliseconds since the epoch of a stored RFC 3339 timestamp.
pub(crate) fn millis(timestamp: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|t| t.timestamp_millis())
}
