//! check command - verify the event store is reachable

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use viewstat_config::Config;
use viewstat_query::{EventStore, StoreEngine};

use crate::cmd::store_config;

/// check command arguments
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// JSON Lines event file (memory store, overrides [store])
    #[arg(short, long)]
    pub events: Option<PathBuf>,
}

/// Run the check command
pub async fn run(args: CheckArgs, config: &Config) -> Result<()> {
    let store_config = store_config(config, args.events.as_ref());
    let store = StoreEngine::from_config(&store_config)
        .await
        .context("failed to open event store")?;

    store
        .health_check()
        .await
        .with_context(|| format!("{} store health check failed", store.backend_name()))?;

    println!("{}: ok", store.backend_name());
    Ok(())
}
