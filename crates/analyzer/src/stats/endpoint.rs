//! Per-url latency aggregates.

use std::collections::HashMap;

use serde::Serialize;

use crate::parser::Record;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointStat {
    pub url: String,
    pub count: usize,
    /// Sum of response times in ms
    pub total_time: u64,
    pub avg_time: f64,
    /// Response times in arrival order
    #[serde(skip_serializing)]
    pub times: Vec<u64>,
    /// Set by [`slowest_endpoints`] only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p90: Option<u64>,
}

impl EndpointStat {
    fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            count: 0,
            total_time: 0,
            avg_time: 0.0,
            times: Vec::new(),
            p90: None,
        }
    }

    fn push(&mut self, resp_time: u64) {
        self.count += 1;
        self.total_time = self.total_time.saturating_add(resp_time);
        self.times.push(resp_time);
    }

    fn finish(&mut self) {
        self.avg_time = if self.count == 0 {
            0.0
        } else {
            self.total_time as f64 / self.count as f64
        };
    }
}

/// Group records by url, most requested first.
///
/// Urls with equal counts keep the order they first appeared in.
pub fn endpoint_stats(records: &[Record]) -> Vec<EndpointStat> {
    let mut stats: Vec<EndpointStat> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let pos = *index.entry(record.url.as_str()).or_insert_with(|| {
            stats.push(EndpointStat::new(&record.url));
            stats.len() - 1
        });
        stats[pos].push(record.resp_time);
    }

    for stat in &mut stats {
        stat.finish();
    }
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// 90th percentile as `sorted[floor(n * 0.9) - 1]`, 0 for an empty set.
pub fn percentile_90(times: &[u64]) -> u64 {
    let mut sorted = times.to_vec();
    sorted.sort_unstable();
    let idx = match sorted.len() {
        0 => return 0,
        1 => 0,
        // floor(n * 0.9) without float rounding
        n => (n * 9 / 10).saturating_sub(1),
    };
    sorted[idx]
}

/// Top `n` urls by average response time, with their p90 filled in.
pub fn slowest_endpoints(records: &[Record], n: usize) -> Vec<EndpointStat> {
    let mut stats = endpoint_stats(records);
    for stat in &mut stats {
        stat.p90 = Some(percentile_90(&stat.times));
    }
    stats.sort_by(|a, b| b.avg_time.total_cmp(&a.avg_time));
    stats.truncate(n);
    stats
}
