//! Command implementations for the viewstat CLI

pub mod check;
pub mod performance;
pub mod top;
pub mod views;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use viewstat_analytics::{AnalyticsEngine, RawPredicate};
use viewstat_config::Config;
use viewstat_query::{StoreConfig, StoreEngine};

/// Event source and row filters shared by the analytics commands
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// JSON Lines event file (memory store, overrides [store])
    #[arg(short, long)]
    pub events: Option<PathBuf>,

    /// Filter as field:op:value, repeatable (in/nin take comma separated lists)
    #[arg(long = "filter", value_name = "FIELD:OP:VALUE")]
    pub filters: Vec<RawPredicate>,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

/// Store config for a command: `--events` wins over the `[store]` section
pub fn store_config(config: &Config, events: Option<&PathBuf>) -> StoreConfig {
    match events {
        Some(path) => StoreConfig::memory(path.clone()),
        None => config.store.clone(),
    }
}

/// Open the event store and wrap it in an analytics engine
pub async fn open_engine(config: &Config, source: &SourceArgs) -> Result<AnalyticsEngine> {
    let store_config = store_config(config, source.events.as_ref());
    let store = StoreEngine::from_config(&store_config)
        .await
        .context("failed to open event store")?;

    tracing::debug!(backend = store.backend_name(), "event store opened");

    Ok(AnalyticsEngine::new(Box::new(store)).with_config(config.analytics))
}

/// The reference time for range lower bounds
pub fn resolve_now(now: Option<DateTime<Utc>>) -> DateTime<Utc> {
    now.unwrap_or_else(Utc::now)
}
