//! Model: AnalyzerConfig and related structs.

use serde::{Deserialize, Serialize};

use crate::parser::{LogFormat, DETECTION_SAMPLE_SIZE, DETECTION_THRESHOLD};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Directory scanned when no files are given
    pub log_dir: String,
    pub max_concurrent_analyses: usize,
    pub detection: DetectionConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Leading non-blank lines scored during detection
    pub sample_size: usize,
    /// Minimum match rate for a grammar to win
    pub threshold: f64,
    /// Registry name of the grammar used when detection fails
    pub fallback_format: String,
}

/// Top-N sizes for the ranked report sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub top_endpoints: usize,
    pub top_slow_requests: usize,
    pub top_slowest_endpoints: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            max_concurrent_analyses: 4,
            detection: DetectionConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sample_size: DETECTION_SAMPLE_SIZE,
            threshold: DETECTION_THRESHOLD,
            fallback_format: LogFormat::Standard.as_str().to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_endpoints: 5,
            top_slow_requests: 10,
            top_slowest_endpoints: 5,
        }
    }
}

impl DetectionConfig {
    /// Validate detection settings
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_size == 0 {
            return Err("detection.sample_size must be > 0".to_string());
        }
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(format!(
                "detection.threshold must be in (0, 1], got {}",
                self.threshold
            ));
        }
        if self.fallback().is_none() {
            return Err(format!(
                "detection.fallback_format '{}' is not a known format",
                self.fallback_format
            ));
        }
        Ok(())
    }

    /// Resolved fallback grammar, `None` if the name is unknown.
    pub fn fallback(&self) -> Option<LogFormat> {
        LogFormat::from_name(&self.fallback_format)
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.top_endpoints == 0 {
            return Err("report.top_endpoints must be > 0".to_string());
        }
        if self.top_slow_requests == 0 {
            return Err("report.top_slow_requests must be > 0".to_string());
        }
        if self.top_slowest_endpoints == 0 {
            return Err("report.top_slowest_endpoints must be > 0".to_string());
        }
        Ok(())
    }
}
