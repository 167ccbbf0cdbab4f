use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use super::model::ParseError;

/// Why a line was dropped, for per-pass diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// No grammar (and no conversion) produced a record
    NoMatch,
    /// A required field was absent or malformed
    BadField,
}

impl From<&ParseError> for DropReason {
    fn from(e: &ParseError) -> Self {
        match e {
            ParseError::Blank | ParseError::NoMatch { .. } => DropReason::NoMatch,
            ParseError::MissingField(_) | ParseError::InvalidMethod(_) => DropReason::BadField,
        }
    }
}

/// Line counters for a single analysis pass.
///
/// Owned by the pass that creates it; nothing here outlives the pass. The
/// counters are atomic so the parse step can be spread over threads and
/// still record through `&self`.
///
/// All operations use `Ordering::Relaxed`. The counters are independent and
/// only read once the pass is finished.
#[derive(Debug, Default)]
pub struct ParsingMetrics {
    total_lines: AtomicU64,
    blank_lines: AtomicU64,
    parsed: AtomicU64,
    converted: AtomicU64,
    resp_time_defaulted: AtomicU64,
    dropped_no_match: AtomicU64,
    dropped_bad_field: AtomicU64,
}

impl ParsingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_line(&self) {
        self.total_lines.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_blank(&self) {
        self.blank_lines.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a line that produced a record.
    #[inline]
    pub fn record_parsed(&self, converted: bool, resp_time_defaulted: bool) {
        self.parsed.fetch_add(1, Ordering::Relaxed);
        if converted {
            self.converted.fetch_add(1, Ordering::Relaxed);
        }
        if resp_time_defaulted {
            self.resp_time_defaulted.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn record_dropped(&self, reason: DropReason) {
        match reason {
            DropReason::NoMatch => self.dropped_no_match.fetch_add(1, Ordering::Relaxed),
            DropReason::BadField => self.dropped_bad_field.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_lines = self.total_lines.load(Ordering::Relaxed);
        let blank_lines = self.blank_lines.load(Ordering::Relaxed);
        let parsed = self.parsed.load(Ordering::Relaxed);
        let dropped_no_match = self.dropped_no_match.load(Ordering::Relaxed);
        let dropped_bad_field = self.dropped_bad_field.load(Ordering::Relaxed);

        let content_lines = total_lines.saturating_sub(blank_lines);

        MetricsSnapshot {
            total_lines,
            blank_lines,
            parsed,
            converted: self.converted.load(Ordering::Relaxed),
            resp_time_defaulted: self.resp_time_defaulted.load(Ordering::Relaxed),
            dropped: dropped_no_match + dropped_bad_field,
            dropped_no_match,
            dropped_bad_field,
            success_rate: if content_lines > 0 {
                parsed as f64 / content_lines as f64
            } else {
                1.0
            },
        }
    }
}

/// Read-only view of [`ParsingMetrics`], serialized into analysis reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub total_lines: u64,
    pub blank_lines: u64,
    pub parsed: u64,
    /// Parsed only after the raw format converter rewrote them
    pub converted: u64,
    pub resp_time_defaulted: u64,
    pub dropped: u64,
    pub dropped_no_match: u64,
    pub dropped_bad_field: u64,
    /// parsed / non-blank lines
    pub success_rate: f64,
}
