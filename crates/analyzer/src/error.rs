use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Analysis task failed: {0}")]
    Task(String),
}

impl AnalyzerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalyzerError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = AnalyzerError> = std::result::Result<T, E>;
