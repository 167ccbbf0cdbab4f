//! Latency spike detection and busiest client addresses.

use std::collections::BTreeMap;

use serde::Serialize;

use super::tally::Tally;
use super::traffic::hour_bucket;
use crate::parser::Record;

/// A bucket must average above this many ms to be a spike.
pub const SPIKE_FLOOR_MS: f64 = 200.0;
/// ...and above this multiple of the mean hourly average.
pub const SPIKE_FACTOR: f64 = 2.0;
/// Number of client addresses reported.
pub const TOP_IPS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyLatency {
    pub hour: String,
    pub avg_time: f64,
    pub requests: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnomalyReport {
    /// Spiking hour buckets, ascending
    pub spike_hours: Vec<HourlyLatency>,
    /// Unweighted mean of the hourly averages
    pub global_avg: f64,
    /// Most frequent client addresses
    pub top_ips: Vec<(String, usize)>,
}

/// Average response time per hour bucket, ascending by bucket.
pub fn hourly_latency(records: &[Record]) -> Vec<HourlyLatency> {
    let mut buckets: BTreeMap<String, (u64, usize)> = BTreeMap::new();
    for record in records {
        if let Some(hour) = hour_bucket(&record.timestamp) {
            let (sum, count) = buckets.entry(hour).or_default();
            *sum = sum.saturating_add(record.resp_time);
            *count += 1;
        }
    }
    buckets
        .into_iter()
        .map(|(hour, (sum, count))| HourlyLatency {
            hour,
            avg_time: sum as f64 / count as f64,
            requests: count,
        })
        .collect()
}

pub fn is_spike(avg_time: f64, global_avg: f64) -> bool {
    avg_time > SPIKE_FLOOR_MS && avg_time > SPIKE_FACTOR * global_avg
}

pub fn detect_anomalies(records: &[Record]) -> AnomalyReport {
    let hourly = hourly_latency(records);
    let global_avg = if hourly.is_empty() {
        0.0
    } else {
        hourly.iter().map(|h| h.avg_time).sum::<f64>() / hourly.len() as f64
    };

    let spike_hours = hourly
        .into_iter()
        .filter(|h| is_spike(h.avg_time, global_avg))
        .collect();

    let ips: Tally = records.iter().map(|r| r.ip.as_str()).collect();

    AnomalyReport {
        spike_hours,
        global_avg,
        top_ips: ips.most_common(TOP_IPS),
    }
}
