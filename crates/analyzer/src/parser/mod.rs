/// Log parsing and normalization module
///
/// Turns raw text lines of unknown layout into canonical `Record`s.
///
/// # Architecture
///
/// - `registry.rs`: static catalogue of line grammars
/// - `detector.rs`: sample-based grammar detection with a confidence threshold
/// - `timestamp.rs`: per-grammar timestamp normalization
/// - `line.rs`: applies one grammar to one line
/// - `synth.rs`: request synthesis for free-text system messages
/// - `convert.rs`: rewrites auxiliary encodings into `standard` lines
/// - `metrics.rs`: per-pass line counters
///
/// # Failure model
///
/// Nothing in here panics on input or surfaces an error past an analysis
/// pass: unparseable lines are dropped, bad timestamps pass through, and a
/// non-numeric response time becomes 0.

pub mod convert;
pub mod detector;
pub mod line;
pub mod metrics;
pub mod model;
pub mod registry;
pub mod synth;
pub mod timestamp;

// Re-export commonly used types
pub use convert::convert_line;
pub use detector::{detect_format, DetectionResult, FormatDetector};
pub use line::{parse_line, parse_line_detailed};
pub use model::{LogFormat, Method, ParseError, Parsed, Record};

// Constants
pub const DETECTION_SAMPLE_SIZE: usize = 20; // Lines to sample for detection
pub const DETECTION_THRESHOLD: f64 = 0.8;
pub const DEFAULT_FORMAT: LogFormat = LogFormat::Standard;
