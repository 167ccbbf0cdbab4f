// Domain-driven module structure for the log analyzer.

// Core
pub mod error;
pub mod parser;
pub mod stats;

// Orchestration
pub mod pipeline;
pub mod conf;
pub mod runtime;

pub use error::{AnalyzerError, Result};
pub use pipeline::{analyze_file, analyze_lines, AnalysisReport, ParseSummary};
