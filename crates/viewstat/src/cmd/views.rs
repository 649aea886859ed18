//! blog-views command - views grouped by viewer country or user
//!
//! # Usage
//!
//! ```bash
//! viewstat blog-views --events data/views.jsonl
//! viewstat blog-views --object-type user --range week --format json
//! viewstat blog-views --filter blog.author.id:eq:1
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use viewstat_analytics::{Dimension, TimeRange};
use viewstat_config::Config;

use crate::cmd::{SourceArgs, open_engine, resolve_now};
use crate::output::{parse_format, render_rows};

/// blog-views command arguments
#[derive(Args, Debug)]
pub struct BlogViewsArgs {
    /// Group by viewer country or viewer user (country, user)
    #[arg(short, long, default_value = "country")]
    pub object_type: String,

    /// Look-back window (day, week, month, year; anything else is all time)
    #[arg(short, long, default_value = "month")]
    pub range: String,

    /// Reference time for the range (RFC 3339, default now)
    #[arg(long)]
    pub now: Option<DateTime<Utc>>,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Run the blog-views command
pub async fn run(args: BlogViewsArgs, config: &Config) -> Result<()> {
    let object_type = Dimension::parse(&args.object_type)?;
    let range = TimeRange::parse(&args.range);
    let format = parse_format(&args.source.format)?;

    let engine = open_engine(config, &args.source).await?;
    let rows = engine
        .blog_views(object_type, range, &args.source.filters, resolve_now(args.now))
        .await
        .context("blog-views failed")?;

    let label = match object_type {
        Dimension::User => "User",
        _ => "Country",
    };
    print!("{}", render_rows(&rows, format, label)?);
    Ok(())
}
