//! Viewstat Analytics Engine
//!
//! Grouping, top-N ranking and period-over-period growth over blog view
//! events, built on top of `viewstat-query`.
//!
//! # Overview
//!
//! - **Filters**: raw `{field, op, value}` predicates, operator policy,
//!   granularity and grouping dimensions
//! - **Query Builder**: raw predicates and time ranges into an [`EventQuery`]
//! - **Aggregation**: calendar buckets and dimension groups
//! - **Growth**: percent change between consecutive buckets
//! - **Engine**: the `blog_views`, `top` and `performance` operations
//!
//! # Usage
//!
//! ```ignore
//! use viewstat_analytics::{AnalyticsEngine, Dimension, Granularity, TimeRange};
//! use viewstat_query::MemoryStore;
//!
//! let store = MemoryStore::load_jsonl("views.jsonl").await?;
//! let engine = AnalyticsEngine::new(Box::new(store));
//!
//! let by_country = engine
//!     .blog_views(Dimension::Country, TimeRange::Month, &[], Utc::now())
//!     .await?;
//! let trend = engine.performance(Granularity::Week, Some(1), &[]).await?;
//! ```
//!
//! [`EventQuery`]: viewstat_query::EventQuery

pub mod aggregate;
pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod growth;
pub mod rows;
pub mod timerange;
pub mod top;

#[cfg(test)]
mod filter_test;
#[cfg(test)]
mod rows_test;
#[cfg(test)]
mod timerange_test;

// Re-exports for convenience
pub use aggregate::{Bucket, GroupRow, UNKNOWN_LABEL, aggregate_by_period, group_by_dimension};
pub use builder::{apply_time_range, build_query};
pub use config::{AnalyticsConfig, MAX_TOP_LIMIT};
pub use engine::AnalyticsEngine;
pub use error::{AnalyticsError, Result};
pub use filter::{Dimension, Granularity, OperatorPolicy, RawPredicate};
pub use growth::{FirstPeriodPolicy, GrowthRow, compute_growth};
pub use rows::{AnalyticsRow, PerformanceRow, total_views};
pub use timerange::TimeRange;
pub use top::top_n;
