use serde::Serialize;

use super::model::LogFormat;
use super::registry::REGISTRY;
use super::{DETECTION_SAMPLE_SIZE, DETECTION_THRESHOLD};

/// Match rate of one grammar over the sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FormatScore {
    pub format: LogFormat,
    /// Fraction of sampled lines fully matched (0.0 - 1.0)
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetectionResult {
    /// Winning grammar, `None` when nothing reached the threshold
    pub format: Option<LogFormat>,
    /// Best match rate seen, winner or not
    pub confidence: f64,
    /// Number of lines the rates were computed over
    pub sample_len: usize,
    /// Per-grammar rates in registry order
    pub scores: Vec<FormatScore>,
}

impl DetectionResult {
    pub fn no_match(sample_len: usize) -> Self {
        Self {
            format: None,
            confidence: 0.0,
            sample_len,
            scores: Vec::new(),
        }
    }

    pub fn is_detected(&self) -> bool {
        self.format.is_some()
    }
}

/// Scores every registry grammar against a line sample and picks a winner.
///
/// 1. Take the first `sample_size` non-blank lines
/// 2. Rate each grammar by the fraction of those lines it fully matches
/// 3. The strictly highest rate wins if it reaches `threshold`; on ties the
///    grammar declared first in the registry wins
#[derive(Debug, Clone, Copy)]
pub struct FormatDetector {
    sample_size: usize,
    threshold: f64,
}

impl FormatDetector {
    pub fn new(sample_size: usize, threshold: f64) -> Self {
        Self {
            sample_size: sample_size.max(1),
            threshold,
        }
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Bounded sample of trimmed, non-blank lines.
    pub fn sample<'a, S: AsRef<str>>(&self, lines: &'a [S]) -> Vec<&'a str> {
        lines
            .iter()
            .map(|l| l.as_ref().trim())
            .filter(|l| !l.is_empty())
            .take(self.sample_size)
            .collect()
    }

    pub fn detect<S: AsRef<str>>(&self, lines: &[S]) -> DetectionResult {
        let sample = self.sample(lines);
        if sample.is_empty() {
            return DetectionResult::no_match(0);
        }

        let total = sample.len() as f64;
        let scores: Vec<FormatScore> = REGISTRY
            .iter()
            .map(|grammar| {
                let hits = sample.iter().filter(|line| grammar.is_match(line)).count();
                FormatScore {
                    format: grammar.format,
                    rate: hits as f64 / total,
                }
            })
            .collect();

        let mut best: Option<FormatScore> = None;
        for score in &scores {
            // strict comparison keeps the earliest grammar on ties
            if best.map_or(true, |b| score.rate > b.rate) {
                best = Some(*score);
            }
        }

        let confidence = best.map(|b| b.rate).unwrap_or(0.0);
        let format = best
            .filter(|b| b.rate > 0.0 && b.rate >= self.threshold)
            .map(|b| b.format);

        DetectionResult {
            format,
            confidence,
            sample_len: sample.len(),
            scores,
        }
    }
}

impl Default for FormatDetector {
    fn default() -> Self {
        Self::new(DETECTION_SAMPLE_SIZE, DETECTION_THRESHOLD)
    }
}

/// Detect the grammar of `sample_lines` with the default sample size and
/// threshold.
pub fn detect_format<S: AsRef<str>>(sample_lines: &[S]) -> Option<LogFormat> {
    FormatDetector::default().detect(sample_lines).format
}
