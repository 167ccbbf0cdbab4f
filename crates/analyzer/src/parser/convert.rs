//! Raw format converter.
//!
//! Rewrites lines in auxiliary encodings into the plain `standard` grammar
//! text so the regular line parser can be reused:
//!
//! 1. application request messages (`app_log_format` shape)
//! 2. free-text system messages (`system_log_format` shape, via synthesis)
//! 3. JSON objects with `timestamp`/`method`/`url`/`status`/`response_time`
//! 4. comma-separated `date,time,method,ip,url,status,resp_time`
//!
//! Shapes are tried in that order; the first that applies wins.

use serde_json::{Map, Value};

use super::line::DEFAULT_IP;
use super::model::LogFormat;
use super::registry;
use super::synth::SyntheticRequest;
use super::timestamp;

/// Number of columns in the delimited encoding.
const CSV_COLUMNS: usize = 7;

/// Which auxiliary encoding a line was recognised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceShape {
    AppRequest,
    SystemMessage,
    Json,
    Delimited,
}

/// Convert `raw` into a `standard` grammar line, or `None` if no shape applies.
pub fn convert_line(raw: &str) -> Option<String> {
    convert_line_with_shape(raw).map(|(line, _)| line)
}

/// Like [`convert_line`], also reporting the recognised shape.
pub fn convert_line_with_shape(raw: &str) -> Option<(String, SourceShape)> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(line) = from_app_request(raw) {
        return Some((line, SourceShape::AppRequest));
    }
    if let Some(line) = from_system_message(raw) {
        return Some((line, SourceShape::SystemMessage));
    }
    if let Some(line) = from_json(raw) {
        return Some((line, SourceShape::Json));
    }
    from_delimited(raw).map(|line| (line, SourceShape::Delimited))
}

/// Fields are copied through; only the fractional seconds are dropped.
fn from_app_request(raw: &str) -> Option<String> {
    let caps = registry::grammar(LogFormat::AppLog).pattern.captures(raw)?;
    // level, timestamp, ip, method, url, status, resp_time
    let ts = timestamp::strip_fraction(caps.get(2)?.as_str());
    Some(format!(
        "{} {} {} {} {} {}",
        ts,
        caps.get(4)?.as_str(),
        caps.get(3)?.as_str(),
        caps.get(5)?.as_str(),
        caps.get(6)?.as_str(),
        caps.get(7)?.as_str(),
    ))
}

fn from_system_message(raw: &str) -> Option<String> {
    let caps = registry::grammar(LogFormat::SystemLog).pattern.captures(raw)?;
    let level = caps.get(1)?.as_str();
    let ts = timestamp::strip_fraction(caps.get(2)?.as_str());
    let message = caps.get(3)?.as_str();
    Some(SyntheticRequest::from_message(level, message).to_line(ts))
}

fn from_json(raw: &str) -> Option<String> {
    if !raw.starts_with('{') {
        return None;
    }
    let value: Value = serde_json::from_str(raw).ok()?;
    let obj = value.as_object()?;

    let ts_raw = scalar(obj, "timestamp")?;
    let ts = if ts_raw.contains('T') {
        timestamp::truncate_iso(&ts_raw)?
    } else {
        timestamp::strip_fraction(&ts_raw).to_string()
    };
    let method = scalar(obj, "method")?;
    let url = scalar(obj, "url")?;
    let status = scalar(obj, "status")?;
    let resp_time = scalar(obj, "response_time")?;
    // anything the standard grammar would reject falls back to the default
    let ip = scalar(obj, "ip")
        .filter(|ip| registry::IPV4_ADDR.is_match(ip))
        .unwrap_or_else(|| DEFAULT_IP.to_string());

    Some(format!("{ts} {method} {ip} {url} {status} {resp_time}"))
}

/// String or number value of `key`, rendered as text.
fn scalar(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn from_delimited(raw: &str) -> Option<String> {
    let cols: Vec<&str> = raw.split(',').map(str::trim).collect();
    if cols.len() != CSV_COLUMNS || cols.iter().any(|c| c.is_empty()) {
        return None;
    }
    Some(cols.join(" "))
}
