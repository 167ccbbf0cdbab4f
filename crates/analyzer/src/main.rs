use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use analyzer::runtime::boot;
use analyzer::runtime::run::{self, OutputFormat, RunOptions};

#[derive(Parser)]
#[command(
    name = "analyzer",
    version,
    about = "Detect, parse and summarize web and application logs"
)]
struct Cli {
    /// Log files to analyze (defaults to every file in the configured log_dir)
    files: Vec<PathBuf>,
    /// Config file (overrides ANALYZER_CONFIG_FILE)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory scanned when no files are given
    #[arg(long)]
    log_dir: Option<String>,
    /// Report output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    /// Also list records whose url or status contains this text
    #[arg(short, long)]
    keyword: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    boot::init_logging();

    let mut config = match boot::boot(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };
    if let Some(dir) = cli.log_dir {
        config.log_dir = dir;
    }

    let options = RunOptions {
        files: cli.files,
        keyword: cli.keyword,
        format: cli.format,
    };

    match run::run(options, config).await {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
