//! Viewstat Query - event model and event stores
//!
//! Defines the [`ViewEvent`] model, the predicate language used to select
//! events, and the [`EventStore`] seam with two implementations:
//! - **Memory**: JSON Lines file loaded into an immutable snapshot
//! - **ClickHouse**: flat view table queried over HTTP with predicate push-down
//!
//! Stores also answer grouped counts ([`EventStore::count_by_period`],
//! [`EventStore::count_by_dimension`]); ClickHouse runs them server-side.
//!
//! # Usage
//!
//! ```ignore
//! use viewstat_query::{EventQuery, Field, Predicate, StoreConfig, StoreEngine};
//!
//! let store = StoreEngine::from_config(&StoreConfig::memory("views.jsonl")).await?;
//! let query = EventQuery::all().and(Predicate::eq(Field::BlogAuthorId, 1i64));
//! let events = store.query(&query).await?;
//! ```

pub mod aggregate;
pub mod backend;
pub mod config;
pub mod error;
pub mod event;
pub mod field;
pub mod filter;

// Re-exports
pub use aggregate::{
    DimensionCount, GroupDimension, Period, PeriodCount, UNKNOWN_LABEL, count_by_dimension,
    count_by_period, truncate,
};
pub use backend::EventStore;
pub use backend::clickhouse::{ClickHouseStore, ClickHouseStoreConfig};
pub use backend::memory::MemoryStore;
pub use config::{ResolvedStoreConfig, StoreBackendType, StoreConfig};
pub use error::StoreError;
pub use event::{Blog, Country, UserRef, ViewEvent};
pub use field::{Field, FieldKind, FieldValue};
pub use filter::{EventQuery, Operator, Predicate, PredicateValue, Scalar};

use std::sync::Arc;

/// Event store chosen at runtime from configuration
#[derive(Clone)]
pub struct StoreEngine {
    store: Arc<dyn EventStore>,
}

impl std::fmt::Debug for StoreEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreEngine")
            .field("backend", &self.store.name())
            .finish()
    }
}

impl StoreEngine {
    /// Wrap a specific store
    pub fn new(store: impl EventStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Open the store a resolved config describes
    ///
    /// The memory backend reads its whole file here.
    pub async fn from_resolved_config(config: &ResolvedStoreConfig) -> Result<Self, StoreError> {
        match config.backend {
            StoreBackendType::Memory => {
                let path = config.path.as_ref().ok_or_else(|| {
                    StoreError::Config("path required for memory backend".to_string())
                })?;
                let store = MemoryStore::load_jsonl(path).await?;
                Ok(Self::new(store))
            }
            StoreBackendType::ClickHouse => {
                let url = config.url.as_ref().ok_or_else(|| {
                    StoreError::Config("url required for clickhouse backend".to_string())
                })?;

                let mut ch_config = ClickHouseStoreConfig::new(url, &config.database)
                    .with_table(&config.table);
                ch_config.max_execution_time = config.max_execution_time;

                if let Some(user) = &config.username {
                    let password = config.password.clone().unwrap_or_default();
                    ch_config = ch_config.with_credentials(user, password);
                }

                let store = ClickHouseStore::new(&ch_config)?;
                Ok(Self::new(store))
            }
        }
    }

    /// Open the store described by an unresolved config
    pub async fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let resolved = ResolvedStoreConfig::from_config(config)?;
        Self::from_resolved_config(&resolved).await
    }

    /// Get the backend name
    pub fn backend_name(&self) -> &'static str {
        self.store.name()
    }
}

#[async_trait::async_trait]
impl EventStore for StoreEngine {
    async fn query(&self, query: &EventQuery) -> Result<Vec<ViewEvent>, StoreError> {
        self.store.query(query).await
    }

    async fn count_by_period(
        &self,
        query: &EventQuery,
        period: Period,
    ) -> Result<Vec<PeriodCount>, StoreError> {
        self.store.count_by_period(query, period).await
    }

    async fn count_by_dimension(
        &self,
        query: &EventQuery,
        dimension: GroupDimension,
    ) -> Result<Vec<DimensionCount>, StoreError> {
        self.store.count_by_dimension(query, dimension).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.store.health_check().await
    }

    fn name(&self) -> &'static str {
        self.store.name()
    }
}
