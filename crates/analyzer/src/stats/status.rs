//! Status code frequencies and error breakdowns.

use serde::Serialize;

use super::tally::Tally;
use super::traffic::hour_bucket;
use crate::parser::Record;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusStats {
    /// Every status code seen
    pub code_counter: Tally,
    /// 4xx/5xx responses per hour bucket
    pub error_by_hour: Tally,
    /// 4xx/5xx responses per url
    pub error_by_url: Tally,
}

impl StatusStats {
    pub fn total_errors(&self) -> usize {
        self.error_by_url.total()
    }

    /// Up to `n` urls by error count.
    pub fn top_error_urls(&self, n: usize) -> Vec<(String, usize)> {
        self.error_by_url.most_common(n)
    }
}

pub fn status_code_stats(records: &[Record]) -> StatusStats {
    let mut stats = StatusStats::default();
    for record in records {
        stats.code_counter.increment(&record.status);
        if !record.is_error() {
            continue;
        }
        // errors without an hour bucket are left out of both breakdowns
        let Some(hour) = hour_bucket(&record.timestamp) else {
            continue;
        };
        stats.error_by_hour.increment(&hour);
        stats.error_by_url.increment(&record.url);
    }
    stats
}
