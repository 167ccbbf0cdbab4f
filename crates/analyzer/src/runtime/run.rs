//! Run: concurrent batch analysis and report rendering.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::conf::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};
use crate::pipeline::{analyze_file, AnalysisReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// What to analyze and how to print it.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Explicit inputs; empty means every file in `log_dir`
    pub files: Vec<PathBuf>,
    pub keyword: Option<String>,
    pub format: OutputFormat,
}

/// Outcome for one input file.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<AnalysisReport>,
}

/// Regular files directly inside `dir`, sorted by path.
pub fn collect_log_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| AnalyzerError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AnalyzerError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Analyze `paths` on blocking tasks, at most `max_concurrent_analyses` at a
/// time. Outcomes come back in input order.
pub async fn analyze_files(
    paths: Vec<PathBuf>,
    config: Arc<AnalyzerConfig>,
    keyword: Option<String>,
) -> Vec<FileOutcome> {
    let permits = Arc::new(Semaphore::new(config.max_concurrent_analyses.max(1)));
    let keyword: Option<Arc<str>> = keyword.map(Arc::from);
    let mut tasks = JoinSet::new();

    for (idx, path) in paths.iter().cloned().enumerate() {
        let permits = Arc::clone(&permits);
        let config = Arc::clone(&config);
        let keyword = keyword.clone();

        tasks.spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(p) => p,
                Err(e) => {
                    return (idx, Err(AnalyzerError::Task(format!("semaphore closed: {}", e))));
                }
            };
            let result = tokio::task::spawn_blocking(move || {
                analyze_file(&path, &config, keyword.as_deref())
            })
            .await
            .unwrap_or_else(|e| Err(AnalyzerError::Task(e.to_string())));
            (idx, result)
        });
    }

    let mut slots: Vec<Option<Result<AnalysisReport>>> = paths.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, result)) => slots[idx] = Some(result),
            Err(e) => error!("Analysis task panicked: {}", e),
        }
    }

    paths
        .into_iter()
        .zip(slots)
        .map(|(path, slot)| FileOutcome {
            result: slot.unwrap_or_else(|| Err(AnalyzerError::Task("task did not complete".into()))),
            path,
        })
        .collect()
}

/// Resolve inputs, analyze them and print each report to stdout.
///
/// Returns the number of files that could not be analyzed.
pub async fn run(options: RunOptions, config: AnalyzerConfig) -> Result<usize> {
    let files = if options.files.is_empty() {
        info!("No files given, scanning {}", config.log_dir);
        collect_log_files(&config.log_dir)?
    } else {
        options.files
    };

    if files.is_empty() {
        warn!("Nothing to analyze");
        return Ok(0);
    }
    info!("Analyzing {} file(s)", files.len());

    let outcomes = analyze_files(files, Arc::new(config), options.keyword).await;

    let mut failures = 0;
    for outcome in outcomes {
        match outcome.result {
            Ok(report) => println!("{}", render(&report, options.format)),
            Err(e) => {
                failures += 1;
                warn!("Skipping {}: {}", outcome.path.display(), e);
            }
        }
    }
    Ok(failures)
}

pub fn render(report: &AnalysisReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize report: {}\"}}", e)),
        OutputFormat::Text => render_text(report),
    }
}

/// Compact human-readable summary.
pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    writeln!(out, "== {} ==", report.source.as_deref().unwrap_or("<input>")).ok();
    writeln!(
        out,
        "format: {}{} (confidence {:.2})",
        summary.format_used,
        if summary.fallback_used { " [fallback]" } else { "" },
        summary.confidence
    )
    .ok();
    writeln!(
        out,
        "lines: {} total, {} parsed, {} converted, {} dropped",
        summary.lines.total_lines, summary.lines.parsed, summary.lines.converted, summary.lines.dropped
    )
    .ok();

    writeln!(out, "traffic by hour:").ok();
    for (hour, count) in &report.traffic_by_hour {
        writeln!(out, "  {}  {}", hour, count).ok();
    }

    writeln!(out, "top endpoints:").ok();
    for stat in &report.top_endpoints {
        writeln!(out, "  {}  {} requests, avg {:.1}ms", stat.url, stat.count, stat.avg_time).ok();
    }

    writeln!(out, "slowest endpoints:").ok();
    for stat in &report.slowest_endpoints {
        writeln!(
            out,
            "  {}  avg {:.1}ms, p90 {}ms",
            stat.url,
            stat.avg_time,
            stat.p90.unwrap_or(0)
        )
        .ok();
    }

    writeln!(out, "status codes:").ok();
    for (code, count) in report.status.code_counter.iter() {
        writeln!(out, "  {}  {}", code, count).ok();
    }

    if !report.anomalies.spike_hours.is_empty() {
        writeln!(out, "latency spikes:").ok();
        for spike in &report.anomalies.spike_hours {
            writeln!(out, "  {}  avg {:.1}ms", spike.hour, spike.avg_time).ok();
        }
    }

    if let (Some(keyword), Some(hits)) = (&report.keyword, &report.keyword_hits) {
        writeln!(out, "matches for '{}': {}", keyword, hits.len()).ok();
    }

    writeln!(out, "suggestions:").ok();
    for suggestion in &report.suggestions {
        writeln!(out, "  - {}", suggestion).ok();
    }
    out
}
