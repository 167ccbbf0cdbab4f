//! Load: config loading from file and environment variables.

use std::fs;
use std::path::Path;

use super::model::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};

pub const CONFIG_FILE_ENV: &str = "ANALYZER_CONFIG_FILE";
pub const DEFAULT_CONFIG_FILE: &str = "analyzer.toml";

impl AnalyzerConfig {
    /// Load configuration from file and environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&config_path)
    }

    /// Like [`AnalyzerConfig::load`] with an explicit file path.
    pub fn load_from(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        let mut config = if config_path.exists() {
            tracing::info!("Loading configuration from: {}", config_path.display());
            Self::from_file(config_path)?
        } else {
            tracing::info!(
                "Config file not found at {}, using defaults and environment variables",
                config_path.display()
            );
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| AnalyzerError::io(path, e))?;
        let config: AnalyzerConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Override settings from variables resolved through `lookup`.
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("ANALYZER_LOG_DIR") {
            self.log_dir = dir;
        }
        if let Some(n) = parsed(&lookup, "ANALYZER_MAX_CONCURRENT") {
            self.max_concurrent_analyses = n;
        }
        if let Some(n) = parsed(&lookup, "ANALYZER_SAMPLE_SIZE") {
            self.detection.sample_size = n;
        }
        if let Some(t) = parsed(&lookup, "ANALYZER_THRESHOLD") {
            self.detection.threshold = t;
        }
    }

    /// Validate that configuration values are sane
    pub fn validate(&self) -> Result<(), String> {
        if self.log_dir.trim().is_empty() {
            return Err("log_dir must not be empty".to_string());
        }
        if self.max_concurrent_analyses == 0 {
            return Err("max_concurrent_analyses must be > 0".to_string());
        }
        self.detection.validate()?;
        self.report.validate()?;
        Ok(())
    }
}

fn parsed<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}
