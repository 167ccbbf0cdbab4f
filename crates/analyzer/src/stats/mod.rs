/// Aggregation and recommendation over parsed records
///
/// Every function here is pure: it takes a record slice, returns an owned
/// aggregate, and keeps no state between calls. Empty input yields the empty
/// form of each aggregate.
///
/// # Architecture
///
/// - `tally.rs`: insertion-ordered counter used for every frequency table
/// - `traffic.rs`: hour buckets and request volume per hour
/// - `endpoint.rs`: per-url counts, averages and p90
/// - `status.rs`: status code frequencies, errors per hour and per url
/// - `anomaly.rs`: latency spikes and busiest client addresses
/// - `search.rs`: slowest requests and keyword search
/// - `advice.rs`: improvement suggestions
///
/// Rankings are stable: equal keys keep first-seen order.

pub mod advice;
pub mod anomaly;
pub mod endpoint;
pub mod search;
pub mod status;
pub mod tally;
pub mod traffic;

pub use advice::{suggest_improvements, Suggestion, SuggestionKind};
pub use anomaly::{detect_anomalies, AnomalyReport};
pub use endpoint::{endpoint_stats, slowest_endpoints, EndpointStat};
pub use search::{search_pattern, slow_requests};
pub use status::{status_code_stats, StatusStats};
pub use tally::Tally;
pub use traffic::{hour_bucket, traffic_by_hour};

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::parser::{Method, Record};

    pub(crate) fn record(timestamp: &str, url: &str, status: &str, resp_time: u64) -> Record {
        Record {
            timestamp: timestamp.to_string(),
            method: Method::Get,
            ip: "10.0.0.1".to_string(),
            url: url.to_string(),
            status: status.to_string(),
            resp_time,
        }
    }
}
