//! Timestamp normalization.
//!
//! Inspect output carries RFC 3339; list output carries the fixed
//! `YYYY-MM-DD HH:mm:ss ±zzzz ZZZ` layout (the trailing zone name is
//! redundant and dropped); Podman list output carries unix seconds.
//!
//! Fallbacks differ per call site on purpose, matching how each normalizer
//! treats an absent date: inspect fields stay `None`, container listings
//! substitute the current time, image listings substitute the epoch.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// RFC 3339 / ISO 8601, with a lenient fallback for the fraction-less
/// `2023-04-10T12:00:00` shape some runtimes emit.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() || value.starts_with("0001-01-01T00:00:00") {
        // go's zero time means "never happened"
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// The list-output layout, e.g. `2023-04-10 12:00:00 -0400 EDT`.
pub fn parse_list_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    // Drop the trailing zone name; the numeric offset is authoritative.
    let trimmed = match value.rsplit_once(' ') {
        Some((head, tail)) if tail.chars().all(|c| c.is_ascii_alphabetic()) => head,
        _ => value,
    };
    DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S %z")
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Unix seconds, as Podman prints in list output.
pub fn parse_unix_seconds(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
}

/// Accepts either layout; list callers that must produce a date fall back
/// through [`or_now`]/[`or_epoch`].
pub fn parse_any_timestamp(value: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(value).or_else(|| parse_list_timestamp(value))
}

pub fn or_now(value: Option<DateTime<Utc>>) -> DateTime<Utc> {
    value.unwrap_or_else(Utc::now)
}

pub fn or_epoch(value: Option<DateTime<Utc>>) -> DateTime<Utc> {
    value.unwrap_or_else(|| DateTime::<Utc>::UNIX_EPOCH)
}
