//! Timestamp normalization to the canonical `YYYY-MM-DD HH:MM:SS` form.
//!
//! Normalization never fails past this boundary: malformed input is passed
//! through unchanged.

use chrono::{DateTime, Local, Month};

use super::model::LogFormat;

/// Canonical output layout.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Common/combined log time, e.g. `03/Jun/2025:08:12:34 +0000`.
const CLF_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Normalize `raw` as produced by `format`'s grammar.
///
/// Returns the original text when it cannot be interpreted.
pub fn normalize(raw: &str, format: LogFormat) -> String {
    try_normalize(raw, format).unwrap_or_else(|| raw.to_string())
}

/// Normalize, reporting failure as `None`.
pub fn try_normalize(raw: &str, format: LogFormat) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    match format {
        LogFormat::Standard | LogFormat::Bracket | LogFormat::AppLog | LogFormat::SystemLog => {
            Some(strip_fraction(raw).to_string())
        }
        LogFormat::Iso => truncate_iso(raw),
        LogFormat::Apache | LogFormat::Nginx => from_clf(raw),
        LogFormat::Simple => Some(with_today(raw)),
    }
}

/// Drop everything from the first `.` on (fractional seconds).
pub fn strip_fraction(raw: &str) -> &str {
    raw.split('.').next().unwrap_or(raw)
}

/// `2025-06-03T08:12:34.123Z` → `2025-06-03 08:12:34`.
///
/// Splits on the date/time separator and keeps the first 8 characters of the
/// time part, which drops fractional seconds and any zone marker.
pub fn truncate_iso(raw: &str) -> Option<String> {
    let (date, time) = raw.split_once('T')?;
    let time = time.get(..8)?;
    Some(format!("{date} {time}"))
}

/// Parse a common-log timestamp and reassemble it without the offset.
///
/// The wall-clock time is kept as written; the offset is discarded, not
/// applied. Fields chrono rejects as a calendar date (`31/Feb`) are still
/// reassembled through the month table.
pub fn from_clf(raw: &str) -> Option<String> {
    match DateTime::parse_from_str(raw, CLF_FORMAT) {
        Ok(dt) => Some(dt.naive_local().format(CANONICAL_FORMAT).to_string()),
        Err(_) => reassemble_clf(raw),
    }
}

/// `DD/Mon/YYYY:HH:MM:SS ±ZZZZ` → `YYYY-MM-DD HH:MM:SS` by field position.
fn reassemble_clf(raw: &str) -> Option<String> {
    let (stamp, _offset) = raw.split_once(' ')?;
    let (date, time) = stamp.split_once(':')?;
    let mut parts = date.splitn(3, '/');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);

    let all_digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(day, 2) || !all_digits(year, 4) || month.len() != 3 {
        return None;
    }
    let time_ok = time.len() == 8
        && time
            .bytes()
            .enumerate()
            .all(|(i, b)| if i == 2 || i == 5 { b == b':' } else { b.is_ascii_digit() });
    if !time_ok {
        return None;
    }

    let month: Month = month.parse().ok()?;
    Some(format!("{year}-{:02}-{day} {time}", month.number_from_month()))
}

/// Prefix a bare time of day with the current local date.
fn with_today(time: &str) -> String {
    format!("{} {}", Local::now().format("%Y-%m-%d"), time)
}
