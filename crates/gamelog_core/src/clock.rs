//! Formatted-timestamp helpers.
//!
//! # Responsibility
//! - Produce and parse the fixed timestamp format stored on every review.
//! - Derive filesystem-safe stamps for backup file names.
//!
//! # Invariants
//! - `TIMESTAMP_FORMAT` never changes: stored documents and backups depend
//!   on it for ordering and round-trips.

use chrono::{Local, NaiveDateTime};

/// Storage/display format for `created_at` / `updated_at`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Returns the current local time in storage format.
pub fn formatted_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a storage-format timestamp.
///
/// Returns `None` for values that do not match `TIMESTAMP_FORMAT`; callers
/// decide how unparsable values sort.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).ok()
}

/// Rewrites a storage-format timestamp into a filename-safe stamp.
///
/// `2024-05-01 09:30:00` becomes `2024-05-01_09_30_00`.
pub fn file_stamp(value: &str) -> String {
    value.replace([':', ' '], "_")
}
