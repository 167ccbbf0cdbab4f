//! Synthesis of request-shaped fields from free-text system messages.
//!
//! The keyword → virtual endpoint table is a best-effort heuristic, not a
//! stable contract. Rules are checked in order and the first hit wins, so a
//! message mentioning several subsystems is attributed to the earliest one.

use super::model::{Method, Record};

/// Address stamped on synthesized records.
pub const SYSTEM_IP: &str = "127.0.0.1";

/// Endpoint used when no keyword matches.
pub const FALLBACK_ROUTE: &str = "/api/system/other";

/// One classification rule: any of `keywords` (lowercase) → `route`.
#[derive(Debug, Clone, Copy)]
pub struct RouteRule {
    pub keywords: &'static [&'static str],
    pub route: &'static str,
}

impl RouteRule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Prioritized keyword rules. Order is significant.
pub const ROUTE_RULES: &[RouteRule] = &[
    RouteRule { keywords: &["database"], route: "/api/system/database" },
    RouteRule { keywords: &["memory"], route: "/api/system/memory" },
    RouteRule { keywords: &["network"], route: "/api/system/network" },
    RouteRule { keywords: &["file"], route: "/api/system/file" },
    RouteRule { keywords: &["ssl", "certificate"], route: "/api/system/ssl" },
    RouteRule { keywords: &["authentication", "auth"], route: "/api/system/auth" },
    RouteRule { keywords: &["session"], route: "/api/system/session" },
    RouteRule { keywords: &["backup"], route: "/api/system/backup" },
    RouteRule { keywords: &["cache"], route: "/api/system/cache" },
    RouteRule { keywords: &["email", "smtp"], route: "/api/system/email" },
    RouteRule { keywords: &["rate limit"], route: "/api/system/ratelimit" },
    RouteRule { keywords: &["service"], route: "/api/system/service" },
    RouteRule { keywords: &["configuration", "config"], route: "/api/system/config" },
    RouteRule { keywords: &["process"], route: "/api/system/process" },
    RouteRule { keywords: &["index"], route: "/api/system/index" },
    RouteRule { keywords: &["external"], route: "/api/system/external" },
];

/// Virtual endpoint for a message (case-insensitive keyword search).
pub fn classify_route(message: &str) -> &'static str {
    let lowered = message.to_lowercase();
    ROUTE_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.route)
        .unwrap_or(FALLBACK_ROUTE)
}

/// Status code implied by a log level.
pub fn status_for_level(level: &str) -> &'static str {
    match level {
        "ERROR" => "500",
        "WARN" => "400",
        _ => "200",
    }
}

/// Response time (ms) implied by a log level.
pub fn resp_time_for_level(level: &str) -> u64 {
    if level == "ERROR" {
        50
    } else {
        30
    }
}

/// Request fields fabricated from a level + message pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticRequest {
    pub url: &'static str,
    pub status: &'static str,
    pub resp_time: u64,
}

impl SyntheticRequest {
    pub fn from_message(level: &str, message: &str) -> Self {
        Self {
            url: classify_route(message),
            status: status_for_level(level),
            resp_time: resp_time_for_level(level),
        }
    }

    /// Build the full record for an already-normalized timestamp.
    pub fn into_record(self, timestamp: String) -> Record {
        Record {
            timestamp,
            method: Method::System,
            ip: SYSTEM_IP.to_string(),
            url: self.url.to_string(),
            status: self.status.to_string(),
            resp_time: self.resp_time,
        }
    }

    /// Standard-grammar line text for this request.
    pub fn to_line(&self, timestamp: &str) -> String {
        format!(
            "{} {} {} {} {} {}",
            timestamp,
            Method::System,
            SYSTEM_IP,
            self.url,
            self.status,
            self.resp_time
        )
    }
}
