//! top command - most viewed users, countries or blogs
//!
//! # Usage
//!
//! ```bash
//! viewstat top --top blog --range week
//! viewstat top --top country --format csv
//! ```
//!
//! The row limit comes from `[analytics] top_limit`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use viewstat_analytics::{Dimension, TimeRange};
use viewstat_config::Config;

use crate::cmd::{SourceArgs, open_engine, resolve_now};
use crate::output::{parse_format, render_rows};

/// top command arguments
#[derive(Args, Debug)]
pub struct TopArgs {
    /// What to rank (user, country, blog)
    #[arg(short, long, default_value = "user")]
    pub top: String,

    /// Look-back window (day, week, month, year; anything else is all time)
    #[arg(short, long, default_value = "month")]
    pub range: String,

    /// Reference time for the range (RFC 3339, default now)
    #[arg(long)]
    pub now: Option<DateTime<Utc>>,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Run the top command
pub async fn run(args: TopArgs, config: &Config) -> Result<()> {
    let top_type = Dimension::parse(&args.top)?;
    let range = TimeRange::parse(&args.range);
    let format = parse_format(&args.source.format)?;

    let engine = open_engine(config, &args.source).await?;
    let rows = engine
        .top(top_type, range, &args.source.filters, resolve_now(args.now))
        .await
        .context("top failed")?;

    let label = match top_type {
        Dimension::User => "User",
        Dimension::Country => "Country",
        Dimension::Blog => "Blog",
    };
    print!("{}", render_rows(&rows, format, label)?);
    Ok(())
}
