//! Line parser: applies one grammar to one line and builds a `Record`.

use regex::Captures;

use super::model::{LogFormat, Method, ParseError, Parsed, Record};
use super::registry::{self, Field, Grammar};
use super::synth::SyntheticRequest;
use super::timestamp;

/// Address used when the grammar has no client address field.
pub const DEFAULT_IP: &str = "0.0.0.0";

/// Parse `line` with the grammar registered under `format_name`.
///
/// Blank or unknown names fall back to the `standard` grammar. Returns `None`
/// when the line does not yield a complete record.
pub fn parse_line(line: &str, format_name: &str) -> Option<Record> {
    parse_line_detailed(line, resolve_name(format_name))
        .ok()
        .map(|parsed| parsed.record)
}

/// Map a caller-supplied name to a format, defaulting to `standard`.
pub fn resolve_name(format_name: &str) -> LogFormat {
    LogFormat::from_name(format_name).unwrap_or(LogFormat::Standard)
}

/// Parse `line` with `format`, reporting why a line was dropped.
pub fn parse_line_detailed(line: &str, format: LogFormat) -> Result<Parsed, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Blank);
    }

    let grammar = registry::grammar(format);
    let caps = grammar
        .pattern
        .captures(line)
        .ok_or(ParseError::NoMatch { format })?;

    let fields = CapturedFields::new(grammar, &caps);

    let raw_timestamp = fields
        .get(Field::Timestamp)
        .or_else(|| fields.get(Field::Time))
        .ok_or(ParseError::MissingField("timestamp"))?;
    let timestamp = timestamp::normalize(raw_timestamp, format);

    if grammar.has_message() {
        let level = fields.require(Field::Level)?;
        let message = fields.require(Field::Message)?;
        let record = SyntheticRequest::from_message(level, message).into_record(timestamp);
        return Ok(Parsed {
            record,
            resp_time_defaulted: false,
        });
    }

    let method: Method = fields.require(Field::Method)?.parse()?;
    let url = fields.require(Field::Url)?;
    let status = fields.require(Field::Status)?;
    let ip = fields.get(Field::Ip).unwrap_or(DEFAULT_IP);

    let (resp_time, resp_time_defaulted) = match fields.require(Field::RespTime)?.parse::<u64>() {
        Ok(ms) => (ms, false),
        Err(_) => (0, true),
    };

    Ok(Parsed {
        record: Record {
            timestamp,
            method,
            ip: ip.to_string(),
            url: url.to_string(),
            status: status.to_string(),
            resp_time,
        },
        resp_time_defaulted,
    })
}

/// Positional view of a grammar's capture groups.
struct CapturedFields<'a> {
    grammar: &'a Grammar,
    caps: &'a Captures<'a>,
}

impl<'a> CapturedFields<'a> {
    fn new(grammar: &'a Grammar, caps: &'a Captures<'a>) -> Self {
        Self { grammar, caps }
    }

    fn get(&self, field: Field) -> Option<&'a str> {
        let idx = self.grammar.fields.iter().position(|f| *f == field)?;
        self.caps
            .get(idx + 1)
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
    }

    fn require(&self, field: Field) -> Result<&'a str, ParseError> {
        self.get(field).ok_or(ParseError::MissingField(field.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::registry::REGISTRY;

    // ─────────────────────────────────────────────────────────
    // One test per grammar, using its documented example
    // ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_standard() {
        let r = parse_line("2025-06-03 08:00:00 GET 192.168.0.1 /api/users 200 100", "standard").unwrap();
        assert_eq!(r.timestamp, "2025-06-03 08:00:00");
        assert_eq!(r.method, Method::Get);
        assert_eq!(r.ip, "192.168.0.1");
        assert_eq!(r.url, "/api/users");
        assert_eq!(r.status, "200");
        assert_eq!(r.resp_time, 100);
    }

    #[test]
    fn test_parse_iso_defaults_ip() {
        let r = parse_line("2025-06-03T08:12:34.123Z GET /api/login 200 123", "iso_format").unwrap();
        assert_eq!(r.timestamp, "2025-06-03 08:12:34");
        assert_eq!(r.method, Method::Get);
        assert_eq!(r.url, "/api/login");
        assert_eq!(r.ip, "0.0.0.0");
        assert_eq!(r.status, "200");
        assert_eq!(r.resp_time, 123);
    }

    #[test]
    fn test_parse_bracket_ms_suffix() {
        let r = parse_line("[2025-06-03 08:12:34] GET /api/login 200 123ms", "bracket_format").unwrap();
        assert_eq!(r.timestamp, "2025-06-03 08:12:34");
        assert_eq!(r.url, "/api/login");
        assert_eq!(r.resp_time, 123);

        let r = parse_line("[2025-06-03 08:12:34] DELETE /api/item/7 204 9", "bracket_format").unwrap();
        assert_eq!(r.method, Method::Delete);
        assert_eq!(r.resp_time, 9);
    }

    #[test]
    fn test_parse_apache() {
        let line = r#"192.168.0.12 - - [03/Jun/2025:08:12:34 +0000] "GET /api/login HTTP/1.1" 200 123"#;
        let r = parse_line(line, "apache_format").unwrap();
        assert_eq!(r.ip, "192.168.0.12");
        assert_eq!(r.timestamp, "2025-06-03 08:12:34");
        assert_eq!(r.method, Method::Get);
        assert_eq!(r.url, "/api/login");
        assert_eq!(r.status, "200");
        assert_eq!(r.resp_time, 123);
    }

    #[test]
    fn test_parse_nginx_with_tail() {
        let line = r#"10.0.0.7 - - [03/Jun/2025:08:12:34 +0900] "POST /api/orders HTTP/1.1" 201 87 "-" "curl/8.5.0""#;
        let r = parse_line(line, "nginx_format").unwrap();
        assert_eq!(r.ip, "10.0.0.7");
        assert_eq!(r.timestamp, "2025-06-03 08:12:34");
        assert_eq!(r.method, Method::Post);
        assert_eq!(r.url, "/api/orders");
        assert_eq!(r.status, "201");
        assert_eq!(r.resp_time, 87);
    }

    #[test]
    fn test_parse_simple_prepends_date() {
        let r = parse_line("08:12:34 PUT /api/profile 200 45", "simple_format").unwrap();
        assert!(r.timestamp.ends_with(" 08:12:34"));
        assert_eq!(r.timestamp.len(), 19);
        assert_eq!(r.method, Method::Put);
        assert_eq!(r.ip, "0.0.0.0");
        assert_eq!(r.resp_time, 45);
    }

    #[test]
    fn test_parse_app_log() {
        let line = "[INFO] 2025-06-10 09:15:23.456 - Client 10.0.1.45 requested GET /api/v1/users with status 200 (response time: 145ms)";
        let r = parse_line(line, "app_log_format").unwrap();
        assert_eq!(r.timestamp, "2025-06-10 09:15:23");
        assert_eq!(r.ip, "10.0.1.45");
        assert_eq!(r.method, Method::Get);
        assert_eq!(r.url, "/api/v1/users");
        assert_eq!(r.status, "200");
        assert_eq!(r.resp_time, 145);
    }

    #[test]
    fn test_parse_system_log_synthesizes_request() {
        let line = "[ERROR] 2025-06-10 09:16:02.118 - Database connection pool exhausted";
        let r = parse_line(line, "system_log_format").unwrap();
        assert_eq!(r.timestamp, "2025-06-10 09:16:02");
        assert_eq!(r.method, Method::System);
        assert_eq!(r.ip, "127.0.0.1");
        assert_eq!(r.url, "/api/system/database");
        assert_eq!(r.status, "500");
        assert_eq!(r.resp_time, 50);
    }

    #[test]
    fn test_parse_system_log_warn_and_info() {
        let r = parse_line("[WARN] 2025-06-10 09:16:02 - Rate limit near for tenant", "system_log_format").unwrap();
        assert_eq!(r.url, "/api/system/ratelimit");
        assert_eq!(r.status, "400");
        assert_eq!(r.resp_time, 30);

        let r = parse_line("[INFO] 2025-06-10 09:16:02 - Scheduler tick", "system_log_format").unwrap();
        assert_eq!(r.url, "/api/system/other");
        assert_eq!(r.status, "200");
        assert_eq!(r.resp_time, 30);
    }

    #[test]
    fn test_every_registry_example_parses() {
        for g in REGISTRY.iter() {
            let parsed = parse_line_detailed(g.example, g.format);
            assert!(parsed.is_ok(), "{} example failed: {:?}", g.name(), parsed);
        }
    }

    // ─────────────────────────────────────────────────────────
    // Fallbacks and failures
    // ─────────────────────────────────────────────────────────

    #[test]
    fn test_unknown_name_falls_back_to_standard() {
        let line = "2025-06-03 08:00:00 POST 10.1.1.1 /api/login 201 150";
        assert!(parse_line(line, "no_such_format").is_some());
        assert!(parse_line(line, "").is_some());
        assert!(parse_line(line, "   ").is_some());
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_line_detailed("   ", LogFormat::Standard), Err(ParseError::Blank));
        assert!(parse_line("", "standard").is_none());
    }

    #[test]
    fn test_mismatch_is_dropped() {
        assert_eq!(
            parse_line_detailed("This is not a valid log line", LogFormat::Standard),
            Err(ParseError::NoMatch { format: LogFormat::Standard })
        );
        // right shape, wrong grammar
        assert!(parse_line("2025-06-03T08:12:34.123Z GET /api/login 200 123", "standard").is_none());
    }

    #[test]
    fn test_system_method_rejected_outside_standard() {
        assert!(parse_line("[2025-06-03 08:12:34] SYSTEM /x 200 1", "bracket_format").is_none());
        assert!(parse_line("2025-06-03 08:12:34 SYSTEM 127.0.0.1 /x 200 1", "standard").is_some());
    }

    #[test]
    fn test_overflowing_resp_time_defaults_to_zero() {
        let line = "2025-06-03 08:00:00 GET 192.168.0.1 /api/users 200 99999999999999999999999";
        let parsed = parse_line_detailed(line, LogFormat::Standard).unwrap();
        assert_eq!(parsed.record.resp_time, 0);
        assert!(parsed.resp_time_defaulted);
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        let r = parse_line("  2025-06-03 08:00:00 GET 192.168.0.1 /api/users 200 100\r\n", "standard");
        assert!(r.is_some());
    }

    #[test]
    fn test_quoted_url_kept_verbatim() {
        let line = r#"2025-06-03 08:00:00 GET 192.168.0.1 "/api/users?name=test&value=123" 200 100"#;
        let r = parse_line(line, "standard").unwrap();
        assert_eq!(r.url, r#""/api/users?name=test&value=123""#);
    }
}
