//! performance command - views per period with growth
//!
//! # Usage
//!
//! ```bash
//! viewstat performance --compare week
//! viewstat performance --compare month --user 1 --format json
//! ```

use anyhow::{Context, Result};
use clap::Args;
use viewstat_analytics::Granularity;
use viewstat_config::Config;

use crate::cmd::{SourceArgs, open_engine};
use crate::output::{parse_format, render_performance};

/// performance command arguments
#[derive(Args, Debug)]
pub struct PerformanceArgs {
    /// Bucket size (day, week, month, year)
    #[arg(short = 'C', long, default_value = "month")]
    pub compare: String,

    /// Only blogs authored by this user id
    #[arg(short, long)]
    pub user: Option<u64>,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Run the performance command
pub async fn run(args: PerformanceArgs, config: &Config) -> Result<()> {
    let compare = Granularity::parse(&args.compare)?;
    let format = parse_format(&args.source.format)?;

    let engine = open_engine(config, &args.source).await?;
    let rows = engine
        .performance(compare, args.user, &args.source.filters)
        .await
        .context("performance failed")?;

    print!("{}", render_performance(&rows, format)?);
    Ok(())
}
