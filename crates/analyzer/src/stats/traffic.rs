//! Hourly request volume.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::parser::Record;

/// Bucket key layout, e.g. `2025-06-03 08:00`.
pub const HOUR_BUCKET_FORMAT: &str = "%Y-%m-%d %H:00";

const SECONDS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const MINUTES_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Truncate a canonical timestamp to its hour.
///
/// Only the 19-character `YYYY-MM-DD HH:MM:SS` and 16-character
/// `YYYY-MM-DD HH:MM` layouts are accepted; anything else is `None`.
pub fn hour_bucket(timestamp: &str) -> Option<String> {
    let layout = match timestamp.len() {
        19 => SECONDS_FORMAT,
        16 => MINUTES_FORMAT,
        _ => return None,
    };
    let dt = NaiveDateTime::parse_from_str(timestamp, layout).ok()?;
    Some(dt.format(HOUR_BUCKET_FORMAT).to_string())
}

/// Request count per hour bucket, ascending by bucket.
///
/// Records whose timestamp has no bucket are skipped.
pub fn traffic_by_hour(records: &[Record]) -> Vec<(String, usize)> {
    let mut buckets: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        if let Some(hour) = hour_bucket(&record.timestamp) {
            *buckets.entry(hour).or_default() += 1;
        }
    }
    buckets.into_iter().collect()
}
