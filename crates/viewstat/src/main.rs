//! viewstat - blog view analytics
//!
//! # Usage
//!
//! ```bash
//! # Views per viewer country over the last 30 days
//! viewstat blog-views --events data/views.jsonl --object-type country
//!
//! # Most viewed blogs this week, as JSON
//! viewstat top --top blog --range week --format json
//!
//! # Monthly views of one author's blogs with growth
//! viewstat performance --compare month --user 1
//!
//! # Verify the configured store is reachable
//! viewstat check --config configs/example.toml
//! ```

mod cmd;
mod output;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use viewstat_config::{Config, LogFormat};

/// viewstat - blog view analytics
#[derive(Parser, Debug)]
#[command(name = "viewstat")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Views grouped by viewer country or viewer user
    BlogViews(cmd::views::BlogViewsArgs),

    /// Most viewed users, countries or blogs
    Top(cmd::top::TopArgs),

    /// Views per period with growth over the previous period
    Performance(cmd::performance::PerformanceArgs),

    /// Check that the event store is reachable
    Check(cmd::check::CheckArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let log_level = resolve_log_level(cli.log_level.as_deref(), &config);
    init_logging(&log_level, config.log.format)?;

    match cli.command {
        Command::BlogViews(args) => cmd::views::run(args, &config).await,
        Command::Top(args) => cmd::top::run(args, &config).await,
        Command::Performance(args) => cmd::performance::run(args, &config).await,
        Command::Check(args) => cmd::check::run(args, &config).await,
    }
}

/// Load the config file if one was given, defaults otherwise
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::from_file(path)?),
        None => Ok(Config::default()),
    }
}

/// Resolve log level: CLI flag > config file > default "info"
fn resolve_log_level(cli_level: Option<&str>, config: &Config) -> String {
    match cli_level {
        Some(level) => level.to_string(),
        None => config.log.level.as_str().to_string(),
    }
}

/// Initialize the tracing subscriber for logging
///
/// Logs go to stderr; stdout carries only command output.
fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Console => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }

    Ok(())
}
