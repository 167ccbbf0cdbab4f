//! Improvement suggestions derived from latency and error aggregates.

use std::fmt;

use serde::Serialize;

use super::endpoint::slowest_endpoints;
use super::status::status_code_stats;
use crate::parser::Record;

/// Endpoints averaging above this many ms get a latency suggestion.
pub const SLOW_ENDPOINT_MS: f64 = 300.0;
/// How many of the slowest endpoints and most failing urls are considered.
pub const CANDIDATES: usize = 3;

const NO_ISSUES: &str = "No notable latency or error hotspots found; nothing to improve right now.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Latency,
    Errors,
    NoIssues,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub message: String,
}

impl Suggestion {
    fn latency(url: &str, avg_time: f64) -> Self {
        Self {
            kind: SuggestionKind::Latency,
            url: Some(url.to_string()),
            message: format!(
                "{url} averages {avg_time:.1}ms. Consider caching its responses or indexing the queries behind it."
            ),
        }
    }

    fn errors(url: &str, count: usize) -> Self {
        Self {
            kind: SuggestionKind::Errors,
            url: Some(url.to_string()),
            message: format!(
                "{url} returned {count} error responses. Review its input validation and fix the failing code paths."
            ),
        }
    }

    fn no_issues() -> Self {
        Self {
            kind: SuggestionKind::NoIssues,
            url: None,
            message: NO_ISSUES.to_string(),
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Latency suggestions first, then error suggestions, each in ranked order.
/// A single no-issues entry is returned when neither rule fires.
pub fn suggest_improvements(records: &[Record]) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = slowest_endpoints(records, CANDIDATES)
        .iter()
        .filter(|s| s.avg_time > SLOW_ENDPOINT_MS)
        .map(|s| Suggestion::latency(&s.url, s.avg_time))
        .collect();

    suggestions.extend(
        status_code_stats(records)
            .top_error_urls(CANDIDATES)
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(url, count)| Suggestion::errors(url, *count)),
    );

    if suggestions.is_empty() {
        suggestions.push(Suggestion::no_issues());
    }
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::fixtures::record;

    #[test]
    fn test_empty_input_yields_fallback() {
        let suggestions = suggest_improvements(&[]);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::NoIssues);
        assert_eq!(suggestions[0].url, None);
    }

    #[test]
    fn test_healthy_traffic_yields_fallback() {
        let records = vec![
            record("2025-06-03 08:00:00", "/a", "200", 120),
            record("2025-06-03 08:00:01", "/b", "201", 300),
        ];
        let suggestions = suggest_improvements(&records);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::NoIssues);
    }

    #[test]
    fn test_single_slow_endpoint_no_fallback() {
        let records = vec![
            record("2025-06-03 08:00:00", "/report", "200", 300),
            record("2025-06-03 08:00:01", "/report", "200", 400),
        ];
        let suggestions = suggest_improvements(&records);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::Latency);
        assert_eq!(suggestions[0].url.as_deref(), Some("/report"));
        assert!(suggestions[0].message.contains("350.0ms"));
    }

    #[test]
    fn test_latency_before_errors() {
        let records = vec![
            record("2025-06-03 08:00:00", "/login", "500", 10),
            record("2025-06-03 08:00:01", "/login", "401", 10),
            record("2025-06-03 08:00:02", "/export", "200", 1200),
            record("2025-06-03 08:00:03", "/search", "404", 450),
        ];
        let kinds: Vec<SuggestionKind> = suggest_improvements(&records).iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SuggestionKind::Latency,
                SuggestionKind::Latency,
                SuggestionKind::Errors,
                SuggestionKind::Errors,
            ]
        );

        let urls: Vec<Option<String>> = suggest_improvements(&records).into_iter().map(|s| s.url).collect();
        assert_eq!(urls[0].as_deref(), Some("/export"));
        assert_eq!(urls[1].as_deref(), Some("/search"));
        assert_eq!(urls[2].as_deref(), Some("/login"));
        assert_eq!(urls[3].as_deref(), Some("/search"));
    }

    #[test]
    fn test_only_top_three_considered() {
        let mut records = Vec::new();
        for (i, url) in ["/a", "/b", "/c", "/d"].iter().enumerate() {
            for _ in 0..(4 - i) {
                records.push(record("2025-06-03 08:00:00", url, "500", 10));
            }
        }
        let suggestions = suggest_improvements(&records);
        assert_eq!(suggestions.len(), 3);
        assert!(suggestions.iter().all(|s| s.kind == SuggestionKind::Errors));
        assert!(suggestions[0].message.contains("4 error responses"));
    }

    #[test]
    fn test_display_is_message() {
        let s = Suggestion::errors("/x", 2);
        assert_eq!(s.to_string(), s.message);
    }
}
