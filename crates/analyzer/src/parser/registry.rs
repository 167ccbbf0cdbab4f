//! Static catalogue of line grammars.
//!
//! Each grammar is a full-line pattern plus the semantic field each capture
//! group maps to, positionally. The registry is built once and shared
//! read-only by every analysis pass.

use std::sync::LazyLock;

use regex::Regex;

use super::model::LogFormat;

/// Semantic meaning of a capture group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Date and time in the grammar's native encoding
    Timestamp,
    /// Time of day only (`HH:MM:SS`)
    Time,
    Method,
    Ip,
    Url,
    Status,
    RespTime,
    Level,
    Message,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Timestamp => "timestamp",
            Field::Time => "time",
            Field::Method => "method",
            Field::Ip => "ip",
            Field::Url => "url",
            Field::Status => "status",
            Field::RespTime => "resp_time",
            Field::Level => "level",
            Field::Message => "message",
        }
    }
}

/// A named line grammar.
#[derive(Debug)]
pub struct Grammar {
    pub format: LogFormat,
    pub pattern: Regex,
    pub fields: &'static [Field],
    /// A line this grammar accepts
    pub example: &'static str,
}

impl Grammar {
    pub fn name(&self) -> &'static str {
        self.format.as_str()
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    pub fn has_ip(&self) -> bool {
        self.fields.contains(&Field::Ip)
    }

    /// Message grammars carry free text instead of request fields.
    pub fn has_message(&self) -> bool {
        self.fields.contains(&Field::Message)
    }
}

const HTTP_METHODS: &str = "GET|POST|PUT|DELETE|PATCH|OPTIONS|HEAD";
const DATE_TIME: &str = r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}(?:\.\d+)?";
const IPV4: &str = r"\d{1,3}(?:\.\d{1,3}){3}";
const CLF_TIME: &str = r"\d{2}/[A-Za-z]{3}/\d{4}:\d{2}:\d{2}:\d{2} [+-]\d{4}";

fn compile(pattern: String) -> Regex {
    Regex::new(&pattern).expect("registry pattern is valid")
}

/// A whole dotted-quad address, the only client address shape grammars accept.
pub static IPV4_ADDR: LazyLock<Regex> = LazyLock::new(|| compile(format!("^{IPV4}$")));

/// All grammars, in declaration (and detection tie-break) order.
pub static REGISTRY: LazyLock<Vec<Grammar>> = LazyLock::new(|| {
    vec![
        Grammar {
            format: LogFormat::Standard,
            pattern: compile(format!(
                r"^({DATE_TIME})\s+({HTTP_METHODS}|SYSTEM)\s+({IPV4})\s+(\S+)\s+(\d{{3}})\s+(\d+)$"
            )),
            fields: &[
                Field::Timestamp,
                Field::Method,
                Field::Ip,
                Field::Url,
                Field::Status,
                Field::RespTime,
            ],
            example: "2025-06-03 08:00:00 GET 192.168.0.1 /api/users 200 100",
        },
        Grammar {
            format: LogFormat::Iso,
            pattern: compile(format!(
                r"^(\d{{4}}-\d{{2}}-\d{{2}}T\d{{2}}:\d{{2}}:\d{{2}}(?:\.\d+)?Z?)\s+({HTTP_METHODS})\s+(\S+)\s+(\d{{3}})\s+(\d+)(?:ms)?$"
            )),
            fields: &[
                Field::Timestamp,
                Field::Method,
                Field::Url,
                Field::Status,
                Field::RespTime,
            ],
            example: "2025-06-03T08:12:34.123Z GET /api/login 200 123",
        },
        Grammar {
            format: LogFormat::Bracket,
            pattern: compile(format!(
                r"^\[({DATE_TIME})\]\s+({HTTP_METHODS})\s+(\S+)\s+(\d{{3}})\s+(\d+)(?:ms)?$"
            )),
            fields: &[
                Field::Timestamp,
                Field::Method,
                Field::Url,
                Field::Status,
                Field::RespTime,
            ],
            example: "[2025-06-03 08:12:34] GET /api/login 200 123ms",
        },
        Grammar {
            format: LogFormat::Apache,
            pattern: compile(format!(
                r#"^({IPV4})\s+\S+\s+\S+\s+\[({CLF_TIME})\]\s+"({HTTP_METHODS})\s+(\S+)(?:\s+[^"]*)?"\s+(\d{{3}})\s+(\d+)$"#
            )),
            fields: &[
                Field::Ip,
                Field::Timestamp,
                Field::Method,
                Field::Url,
                Field::Status,
                Field::RespTime,
            ],
            example: r#"192.168.0.12 - - [03/Jun/2025:08:12:34 +0000] "GET /api/login HTTP/1.1" 200 123"#,
        },
        Grammar {
            format: LogFormat::Nginx,
            pattern: compile(format!(
                r#"^({IPV4})\s+\S+\s+\S+\s+\[({CLF_TIME})\]\s+"({HTTP_METHODS})\s+(\S+)(?:\s+[^"]*)?"\s+(\d{{3}})\s+(\d+)(?:\s+"[^"]*"\s+"[^"]*")?$"#
            )),
            fields: &[
                Field::Ip,
                Field::Timestamp,
                Field::Method,
                Field::Url,
                Field::Status,
                Field::RespTime,
            ],
            example: r#"10.0.0.7 - - [03/Jun/2025:08:12:34 +0900] "POST /api/orders HTTP/1.1" 201 87 "-" "curl/8.5.0""#,
        },
        Grammar {
            format: LogFormat::Simple,
            pattern: compile(format!(
                r"^(\d{{2}}:\d{{2}}:\d{{2}})\s+({HTTP_METHODS})\s+(\S+)\s+(\d{{3}})\s+(\d+)(?:ms)?$"
            )),
            fields: &[
                Field::Time,
                Field::Method,
                Field::Url,
                Field::Status,
                Field::RespTime,
            ],
            example: "08:12:34 GET /api/login 200 123",
        },
        Grammar {
            format: LogFormat::AppLog,
            pattern: compile(format!(
                r"^\[([A-Z]+)\]\s+({DATE_TIME})\s+-\s+Client\s+({IPV4})\s+requested\s+({HTTP_METHODS})\s+(\S+)\s+with\s+status\s+(\d{{3}})\s+\(response time:\s*(\d+)ms\)$"
            )),
            fields: &[
                Field::Level,
                Field::Timestamp,
                Field::Ip,
                Field::Method,
                Field::Url,
                Field::Status,
                Field::RespTime,
            ],
            example: "[INFO] 2025-06-10 09:15:23.456 - Client 10.0.1.45 requested GET /api/v1/users with status 200 (response time: 145ms)",
        },
        Grammar {
            format: LogFormat::SystemLog,
            pattern: compile(format!(r"^\[([A-Z]+)\]\s+({DATE_TIME})\s+-\s+(.+)$")),
            fields: &[Field::Level, Field::Timestamp, Field::Message],
            example: "[ERROR] 2025-06-10 09:16:02.118 - Database connection pool exhausted",
        },
    ]
});

/// Grammar for a registry format.
pub fn grammar(format: LogFormat) -> &'static Grammar {
    REGISTRY
        .iter()
        .find(|g| g.format == format)
        .expect("every LogFormat has a registry entry")
}

/// Grammar for a registry name, if known.
pub fn find(name: &str) -> Option<&'static Grammar> {
    LogFormat::from_name(name).map(grammar)
}
