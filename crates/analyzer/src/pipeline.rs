//! Single-pass analysis: detect, parse, aggregate, advise.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::conf::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};
use crate::parser::metrics::{DropReason, MetricsSnapshot, ParsingMetrics};
use crate::parser::{
    convert_line, parse_line_detailed, DetectionResult, FormatDetector, LogFormat, Record,
    DEFAULT_FORMAT,
};
use crate::stats::{
    detect_anomalies, endpoint_stats, search_pattern, slow_requests, slowest_endpoints,
    status_code_stats, suggest_improvements, traffic_by_hour, AnomalyReport, EndpointStat,
    StatusStats, Suggestion,
};

/// How the lines of one source were turned into records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseSummary {
    /// Grammar chosen by detection, if any reached the threshold
    pub detected_format: Option<LogFormat>,
    /// Best match rate seen during detection
    pub confidence: f64,
    /// Grammar actually applied to every line
    pub format_used: LogFormat,
    /// Detection failed and the fallback grammar plus converter were used
    pub fallback_used: bool,
    #[serde(flatten)]
    pub lines: MetricsSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub summary: ParseSummary,
    pub traffic_by_hour: Vec<(String, usize)>,
    pub top_endpoints: Vec<EndpointStat>,
    pub status: StatusStats,
    pub slow_requests: Vec<Record>,
    pub slowest_endpoints: Vec<EndpointStat>,
    pub anomalies: AnomalyReport,
    pub suggestions: Vec<Suggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_hits: Option<Vec<Record>>,
    #[serde(skip)]
    pub records: Vec<Record>,
}

/// Analyze an in-memory line sequence.
///
/// Never fails: lines that yield no record are counted and dropped.
pub fn analyze_lines<S: AsRef<str>>(
    lines: &[S],
    config: &AnalyzerConfig,
    keyword: Option<&str>,
) -> AnalysisReport {
    let detector = FormatDetector::new(config.detection.sample_size, config.detection.threshold);
    let detection = detector.detect(lines);

    let (format_used, fallback_used) = match detection.format {
        Some(format) => {
            info!(
                "Detected {} (confidence {:.2} over {} lines)",
                format, detection.confidence, detection.sample_len
            );
            (format, false)
        }
        None => {
            let fallback = config.detection.fallback().unwrap_or(DEFAULT_FORMAT);
            warn!(
                "No format reached threshold {:.2} (best {:.2}); falling back to {}",
                detector.threshold(),
                detection.confidence,
                fallback
            );
            (fallback, true)
        }
    };

    let metrics = ParsingMetrics::new();
    let records = parse_records(lines, format_used, fallback_used, &metrics);
    let summary = summarize(&detection, format_used, fallback_used, metrics.snapshot());

    build_report(records, summary, config, keyword)
}

/// Read `path` (invalid UTF-8 is replaced) and analyze its lines.
pub fn analyze_file(
    path: impl AsRef<Path>,
    config: &AnalyzerConfig,
    keyword: Option<&str>,
) -> Result<AnalysisReport> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| AnalyzerError::io(path, e))?;
    let text = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = text.lines().collect();

    let mut report = analyze_lines(&lines, config, keyword);
    report.source = Some(path.display().to_string());

    info!(
        "{}: {} of {} lines parsed as {}",
        path.display(),
        report.summary.lines.parsed,
        report.summary.lines.total_lines,
        report.summary.format_used
    );
    Ok(report)
}

/// Parse every line with `format`.
///
/// With `convert` set, a line the grammar rejects gets one more try through
/// the raw format converter and the `standard` grammar.
pub fn parse_records<S: AsRef<str>>(
    lines: &[S],
    format: LogFormat,
    convert: bool,
    metrics: &ParsingMetrics,
) -> Vec<Record> {
    let mut records = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        metrics.record_line();
        if line.trim().is_empty() {
            metrics.record_blank();
            continue;
        }

        let err = match parse_line_detailed(line, format) {
            Ok(parsed) => {
                metrics.record_parsed(false, parsed.resp_time_defaulted);
                records.push(parsed.record);
                continue;
            }
            Err(e) => e,
        };

        if convert {
            let converted = convert_line(line)
                .and_then(|text| parse_line_detailed(&text, LogFormat::Standard).ok());
            if let Some(parsed) = converted {
                metrics.record_parsed(true, parsed.resp_time_defaulted);
                records.push(parsed.record);
                continue;
            }
        }

        debug!("Dropping line {}: {}", idx + 1, err);
        metrics.record_dropped(DropReason::from(&err));
    }

    records
}

fn summarize(
    detection: &DetectionResult,
    format_used: LogFormat,
    fallback_used: bool,
    lines: MetricsSnapshot,
) -> ParseSummary {
    ParseSummary {
        detected_format: detection.format,
        confidence: detection.confidence,
        format_used,
        fallback_used,
        lines,
    }
}

fn build_report(
    records: Vec<Record>,
    summary: ParseSummary,
    config: &AnalyzerConfig,
    keyword: Option<&str>,
) -> AnalysisReport {
    let report_cfg = &config.report;

    let mut top_endpoints = endpoint_stats(&records);
    top_endpoints.truncate(report_cfg.top_endpoints);

    AnalysisReport {
        source: None,
        traffic_by_hour: traffic_by_hour(&records),
        top_endpoints,
        status: status_code_stats(&records),
        slow_requests: slow_requests(&records, report_cfg.top_slow_requests),
        slowest_endpoints: slowest_endpoints(&records, report_cfg.top_slowest_endpoints),
        anomalies: detect_anomalies(&records),
        suggestions: suggest_improvements(&records),
        keyword: keyword.map(str::to_string),
        keyword_hits: keyword.map(|k| search_pattern(&records, k)),
        summary,
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_lines() -> Vec<String> {
        vec![
            "2025-06-03 08:00:00 GET 192.168.0.1 /api/users 200 100".to_string(),
            "2025-06-03 08:10:00 POST 192.168.0.2 /api/login 401 150".to_string(),
            "2025-06-03 09:00:00 GET 192.168.0.1 /api/users 200 500".to_string(),
        ]
    }

    #[test]
    fn test_parse_records_counts() {
        let lines = ["2025-06-03 08:00:00 GET 10.0.0.1 /a 200 5", "", "garbage"];
        let metrics = ParsingMetrics::new();
        let records = parse_records(&lines, LogFormat::Standard, false, &metrics);
        assert_eq!(records.len(), 1);
        let snap = metrics.snapshot();
        assert_eq!(snap.total_lines, 3);
        assert_eq!(snap.blank_lines, 1);
        assert_eq!(snap.dropped_no_match, 1);
        assert_eq!(snap.converted, 0);
    }

    #[test]
    fn test_parse_records_with_conversion() {
        let lines = [
            "2025-06-03 08:00:00 GET 10.0.0.1 /a 200 5",
            "2025-06-10,09:15:23,GET,10.0.1.45,/api/users,200,145",
            "free text",
        ];
        let metrics = ParsingMetrics::new();
        let records = parse_records(&lines, LogFormat::Standard, true, &metrics);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].url, "/api/users");
        let snap = metrics.snapshot();
        assert_eq!(snap.converted, 1);
        assert_eq!(snap.dropped, 1);
    }

    #[test]
    fn test_analyze_detected_format() {
        let report = analyze_lines(&standard_lines(), &AnalyzerConfig::default(), None);
        assert_eq!(report.summary.detected_format, Some(LogFormat::Standard));
        assert!(!report.summary.fallback_used);
        assert_eq!(report.records.len(), 3);
        assert_eq!(report.traffic_by_hour.len(), 2);
        assert_eq!(report.top_endpoints[0].url, "/api/users");
        assert_eq!(report.status.error_by_url.get("/api/login"), 1);
        assert_eq!(report.slow_requests[0].resp_time, 500);
        assert!(report.keyword_hits.is_none());
    }

    #[test]
    fn test_analyze_respects_report_limits() {
        let mut config = AnalyzerConfig::default();
        config.report.top_endpoints = 1;
        config.report.top_slow_requests = 2;
        config.report.top_slowest_endpoints = 1;
        let report = analyze_lines(&standard_lines(), &config, None);
        assert_eq!(report.top_endpoints.len(), 1);
        assert_eq!(report.slow_requests.len(), 2);
        assert_eq!(report.slowest_endpoints.len(), 1);
    }

    #[test]
    fn test_analyze_keyword() {
        let report = analyze_lines(&standard_lines(), &AnalyzerConfig::default(), Some("login"));
        assert_eq!(report.keyword.as_deref(), Some("login"));
        let hits = report.keyword_hits.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].status, "401");
    }

    #[test]
    fn test_analyze_fallback_on_unknown() {
        let lines = [
            "2025-06-03 08:00:00 GET 10.0.0.1 /a 200 5",
            r#"{"timestamp":"2025-06-03T08:05:00Z","method":"GET","url":"/b","status":200,"response_time":7}"#,
            "2025-06-03,08:06:00,POST,10.0.0.2,/c,201,9",
            "nothing useful here",
        ];
        let report = analyze_lines(&lines, &AnalyzerConfig::default(), None);
        assert_eq!(report.summary.detected_format, None);
        assert!(report.summary.fallback_used);
        assert_eq!(report.summary.format_used, LogFormat::Standard);
        assert_eq!(report.records.len(), 3);
        assert_eq!(report.summary.lines.converted, 2);
        assert_eq!(report.summary.lines.dropped, 1);
    }

    #[test]
    fn test_analyze_empty() {
        let lines: [&str; 0] = [];
        let report = analyze_lines(&lines, &AnalyzerConfig::default(), None);
        assert!(report.records.is_empty());
        assert!(report.traffic_by_hour.is_empty());
        assert!(report.top_endpoints.is_empty());
        assert!(report.slow_requests.is_empty());
        assert!(report.anomalies.spike_hours.is_empty());
        assert_eq!(report.suggestions.len(), 1);
        assert_eq!(report.summary.lines.success_rate, 1.0);
    }

    #[test]
    fn test_report_serializes() {
        let report = analyze_lines(&standard_lines(), &AnalyzerConfig::default(), None);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["summary"]["format_used"], "standard");
        assert_eq!(json["summary"]["parsed"], 3);
        assert_eq!(json["status"]["code_counter"]["200"], 2);
        assert!(json.get("records").is_none());
        assert!(json.get("source").is_none());
    }
}
