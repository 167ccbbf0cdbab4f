//! Boot: logging init and config load.

use std::path::Path;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};

/// Initialise the tracing / logging subsystem.
///
/// Logs go to stderr so reports on stdout stay machine-readable.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "analyzer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load config (explicit path, or file/env) and validate it.
pub fn boot(config_path: Option<&Path>) -> Result<AnalyzerConfig> {
    info!("Starting log analyzer v{}", env!("CARGO_PKG_VERSION"));

    let config = match config_path {
        Some(path) => AnalyzerConfig::load_from(path)?,
        None => AnalyzerConfig::load()?,
    };

    config.validate().map_err(|e| {
        error!("Configuration rejected: {}", e);
        AnalyzerError::Config(e)
    })?;

    info!(
        "Loaded configuration: log_dir={}, max_concurrent_analyses={}",
        config.log_dir, config.max_concurrent_analyses
    );
    info!(
        "Detection: sample_size={}, threshold={}, fallback={}",
        config.detection.sample_size, config.detection.threshold, config.detection.fallback_format
    );

    Ok(config)
}
