use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Named log grammars known to the registry.
///
/// Declaration order here mirrors the registry order, which is the
/// detection tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// `YYYY-MM-DD HH:MM:SS METHOD IP PATH CODE MS`
    Standard,
    /// ISO-8601 timestamp, no client address
    #[serde(rename = "iso_format")]
    Iso,
    /// `[YYYY-MM-DD HH:MM:SS] METHOD PATH CODE MS[ms]`
    #[serde(rename = "bracket_format")]
    Bracket,
    /// Apache common log style
    #[serde(rename = "apache_format")]
    Apache,
    /// Nginx combined log style
    #[serde(rename = "nginx_format")]
    Nginx,
    /// Bare `HH:MM:SS`, no date
    #[serde(rename = "simple_format")]
    Simple,
    /// `[LEVEL] ts - Client IP requested METHOD PATH with status CODE (response time: MSms)`
    #[serde(rename = "app_log_format")]
    AppLog,
    /// `[LEVEL] ts - free text`
    #[serde(rename = "system_log_format")]
    SystemLog,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Standard => "standard",
            LogFormat::Iso => "iso_format",
            LogFormat::Bracket => "bracket_format",
            LogFormat::Apache => "apache_format",
            LogFormat::Nginx => "nginx_format",
            LogFormat::Simple => "simple_format",
            LogFormat::AppLog => "app_log_format",
            LogFormat::SystemLog => "system_log_format",
        }
    }

    /// Look up a grammar by its registry name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "standard" => Some(LogFormat::Standard),
            "iso_format" => Some(LogFormat::Iso),
            "bracket_format" => Some(LogFormat::Bracket),
            "apache_format" => Some(LogFormat::Apache),
            "nginx_format" => Some(LogFormat::Nginx),
            "simple_format" => Some(LogFormat::Simple),
            "app_log_format" => Some(LogFormat::AppLog),
            "system_log_format" => Some(LogFormat::SystemLog),
            _ => None,
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request method of a record. `System` only appears on records synthesized
/// from free-text system messages (or lines converted from them).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    System,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
            Method::Head => "HEAD",
            Method::System => "SYSTEM",
        }
    }
}

impl FromStr for Method {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "OPTIONS" => Ok(Method::Options),
            "HEAD" => Ok(Method::Head),
            "SYSTEM" => Ok(Method::System),
            other => Err(ParseError::InvalidMethod(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One canonical parsed log entry.
///
/// Every field is always present. Records are built once by the line parser
/// and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// `YYYY-MM-DD HH:MM:SS` (or the raw source text if normalization failed)
    pub timestamp: String,
    pub method: Method,
    pub ip: String,
    pub url: String,
    /// Three-digit status code, kept as text
    pub status: String,
    /// Response time in milliseconds
    pub resp_time: u64,
}

impl Record {
    /// True for 4xx and 5xx status codes.
    pub fn is_error(&self) -> bool {
        self.status.starts_with('4') || self.status.starts_with('5')
    }
}

/// Successful line parse, with a note on whether any field was defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub record: Record,
    /// `resp_time` could not be coerced and was set to 0
    pub resp_time_defaulted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Blank line")]
    Blank,

    #[error("Line does not match {format}")]
    NoMatch { format: LogFormat },

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid method: {0}")]
    InvalidMethod(String),
}
