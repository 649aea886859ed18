//! Event store configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Store configuration, as written in the `[store]` config section
///
/// Either points at a JSON Lines file (memory backend) or carries
/// ClickHouse connection details. The backend is inferred when not named.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend type (memory, clickhouse)
    pub backend: Option<String>,

    /// JSON Lines event file - for memory backend
    pub path: Option<PathBuf>,

    /// ClickHouse HTTP URL
    pub url: Option<String>,

    /// Database name
    pub database: Option<String>,

    /// Table holding one row per view
    pub table: String,

    /// Username for authentication
    pub username: Option<String>,

    /// Password for authentication
    pub password: Option<String>,

    /// Server-side query time limit in seconds
    pub max_execution_time: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: None,
            path: None,
            url: None,
            database: None,
            table: "blog_views".into(),
            username: None,
            password: None,
            max_execution_time: 60,
        }
    }
}

impl StoreConfig {
    /// Create config for the in-memory backend
    pub fn memory(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Some("memory".to_string()),
            path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Create config for the ClickHouse backend
    pub fn clickhouse(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            backend: Some("clickhouse".to_string()),
            url: Some(url.into()),
            database: Some(database.into()),
            ..Default::default()
        }
    }
}

/// Store configuration with the backend decided
#[derive(Debug, Clone)]
pub struct ResolvedStoreConfig {
    pub backend: StoreBackendType,
    pub path: Option<PathBuf>,
    pub url: Option<String>,
    pub database: String,
    pub table: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub max_execution_time: u64,
}

/// Event store backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackendType {
    /// JSON Lines file loaded into memory
    Memory,
    /// ClickHouse over HTTP
    ClickHouse,
}

impl ResolvedStoreConfig {
    /// Resolve the backend, explicitly named or inferred
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let backend = match config.backend.as_deref() {
            Some("memory") | Some("jsonl") => StoreBackendType::Memory,
            Some("clickhouse") => StoreBackendType::ClickHouse,
            Some(other) => {
                return Err(StoreError::Config(format!("unknown backend: {}", other)));
            }
            None => {
                if config.url.is_some() {
                    StoreBackendType::ClickHouse
                } else if config.path.is_some() {
                    StoreBackendType::Memory
                } else {
                    return Err(StoreError::Config(
                        "no event store configured. Options:\n  \
                         1. path = \"views.jsonl\"  (JSON Lines file, memory backend)\n  \
                         2. url = \"http://localhost:8123\"  (ClickHouse URL)\n\
                         See configs/example.toml [store] section for examples."
                            .to_string(),
                    ));
                }
            }
        };

        Ok(Self {
            backend,
            path: config.path.clone(),
            url: config.url.clone(),
            database: config.database.clone().unwrap_or_else(|| "default".to_string()),
            table: config.table.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            max_execution_time: config.max_execution_time,
        })
    }
}
