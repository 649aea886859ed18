//! Configuration validation
//!
//! Validates config consistency:
//! - The store backend is known and has the fields it needs
//! - Analytics tunables are in range
//!
//! A memory store without `path` is accepted here; the CLI can supply the
//! event file with `--events`.

use crate::Config;
use crate::error::{ConfigError, Result};

/// Store backends accepted in `[store] backend`
const KNOWN_BACKENDS: &[&str] = &["memory", "jsonl", "clickhouse"];

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_store(config)?;
    validate_analytics(config)?;
    Ok(())
}

fn validate_store(config: &Config) -> Result<()> {
    let store = &config.store;

    if let Some(backend) = store.backend.as_deref() {
        if !KNOWN_BACKENDS.contains(&backend) {
            return Err(ConfigError::invalid_value(
                "store",
                "backend",
                format!("unknown backend '{}' (expected memory or clickhouse)", backend),
            ));
        }
        if backend == "clickhouse" && store.url.is_none() {
            return Err(ConfigError::missing_field(
                "store",
                "url",
                "the clickhouse backend",
            ));
        }
    }

    if store.table.trim().is_empty() {
        return Err(ConfigError::invalid_value("store", "table", "must not be empty"));
    }

    if store.max_execution_time == 0 {
        return Err(ConfigError::invalid_value(
            "store",
            "max_execution_time",
            "must be at least 1 second",
        ));
    }

    Ok(())
}

fn validate_analytics(config: &Config) -> Result<()> {
    config
        .analytics
        .validate()
        .map_err(|message| ConfigError::invalid_value("analytics", "top_limit", message))
}
