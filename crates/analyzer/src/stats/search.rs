//! Record selection: slowest individual requests and keyword search.

use crate::parser::Record;

/// The `n` slowest records, slowest first.
///
/// Records with equal response times keep their input order.
pub fn slow_requests(records: &[Record], n: usize) -> Vec<Record> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.resp_time.cmp(&a.resp_time));
    sorted.truncate(n);
    sorted
}

/// Records whose url or status contains `keyword` (case-sensitive).
pub fn search_pattern(records: &[Record], keyword: &str) -> Vec<Record> {
    records
        .iter()
        .filter(|r| r.url.contains(keyword) || r.status.contains(keyword))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::fixtures::record;

    #[test]
    fn test_slow_requests_top_two() {
        let records = vec![
            record("2025-06-03 08:00:00", "/a", "200", 1),
            record("2025-06-03 08:00:01", "/b", "200", 999_999),
            record("2025-06-03 08:00:02", "/c", "200", 100),
        ];
        let slow = slow_requests(&records, 2);
        assert_eq!(slow, vec![records[1].clone(), records[2].clone()]);
    }

    #[test]
    fn test_slow_requests_stable_and_bounded() {
        let records = vec![
            record("2025-06-03 08:00:00", "/first", "200", 50),
            record("2025-06-03 08:00:01", "/second", "200", 50),
        ];
        let slow = slow_requests(&records, 10);
        assert_eq!(slow[0].url, "/first");
        assert_eq!(slow[1].url, "/second");
        assert!(slow_requests(&records, 0).is_empty());
        assert!(slow_requests(&[], 3).is_empty());
    }

    #[test]
    fn test_search_url_and_status() {
        let records = vec![
            record("2025-06-03 08:00:00", "/api/users", "200", 1),
            record("2025-06-03 08:00:01", "/api/login", "404", 1),
            record("2025-06-03 08:00:02", "/health", "200", 1),
        ];
        let hits = search_pattern(&records, "api");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "/api/users");

        let hits = search_pattern(&records, "404");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "/api/login");
    }

    #[test]
    fn test_search_case_sensitive() {
        let records = vec![record("2025-06-03 08:00:00", "/API/users", "200", 1)];
        assert!(search_pattern(&records, "api").is_empty());
        assert_eq!(search_pattern(&records, "API").len(), 1);
    }
}
