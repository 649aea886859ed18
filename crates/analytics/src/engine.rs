//! Analytics engine
//!
//! Runs the three reporting operations against an event store. Each call
//! builds a query and asks the store for grouped counts once; ranking and
//! growth run over those counts.

use chrono::{DateTime, Utc};
use viewstat_query::{EventQuery, EventStore, Field, Predicate, StoreError};

use crate::aggregate::{Bucket, GroupRow};
use crate::builder::{apply_time_range, build_query};
use crate::config::AnalyticsConfig;
use crate::error::{AnalyticsError, Result};
use crate::filter::{Dimension, Granularity, RawPredicate};
use crate::growth::compute_growth;
use crate::rows::{AnalyticsRow, PerformanceRow};
use crate::timerange::TimeRange;
use crate::top::top_n;

/// Analytics engine over an event store
pub struct AnalyticsEngine {
    store: Box<dyn EventStore>,
    config: AnalyticsConfig,
}

impl AnalyticsEngine {
    /// Create an engine with default configuration
    pub fn new(store: Box<dyn EventStore>) -> Self {
        Self {
            store,
            config: AnalyticsConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AnalyticsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Get a reference to the underlying store
    pub fn store(&self) -> &dyn EventStore {
        self.store.as_ref()
    }

    /// Views grouped by viewer country or viewer user
    ///
    /// Rows are ordered by view count descending; ties keep first-seen order.
    pub async fn blog_views(
        &self,
        object_type: Dimension,
        range: TimeRange,
        filters: &[RawPredicate],
        now: DateTime<Utc>,
    ) -> Result<Vec<AnalyticsRow>> {
        if object_type == Dimension::Blog {
            return Err(AnalyticsError::InvalidDimension(format!(
                "{} (blog views group by country or user)",
                object_type
            )));
        }

        let query = apply_time_range(&self.base_query(filters)?, range, now);
        let groups = self.groups(&query, object_type).await?;

        let rows: Vec<AnalyticsRow> = groups.into_iter().map(AnalyticsRow::from).collect();
        let rows = top_n(rows, usize::MAX, |r| r.z);

        tracing::debug!(
            object_type = %object_type,
            range = %range,
            rows = rows.len(),
            "blog_views computed"
        );

        Ok(rows)
    }

    /// The most viewed users, countries or blogs
    ///
    /// Returns at most `top_limit` rows. For blogs, `y` is always 1.
    pub async fn top(
        &self,
        top_type: Dimension,
        range: TimeRange,
        filters: &[RawPredicate],
        now: DateTime<Utc>,
    ) -> Result<Vec<AnalyticsRow>> {
        let query = apply_time_range(&self.base_query(filters)?, range, now);
        let groups = self.groups(&query, top_type).await?;

        let total = groups.len();
        let rows: Vec<AnalyticsRow> = groups.into_iter().map(AnalyticsRow::from).collect();
        let rows = top_n(rows, self.config.top_limit, |r| r.z);

        tracing::debug!(
            top_type = %top_type,
            range = %range,
            limit = self.config.top_limit,
            groups = total,
            rows = rows.len(),
            "top computed"
        );

        Ok(rows)
    }

    /// Views per period with growth over the previous period
    ///
    /// `user_filter` restricts to blogs authored by that user. No time range
    /// applies; every matching event is bucketed.
    pub async fn performance(
        &self,
        compare: Granularity,
        user_filter: Option<u64>,
        filters: &[RawPredicate],
    ) -> Result<Vec<PerformanceRow>> {
        let mut query = self.base_query(filters)?;
        if let Some(author) = user_filter {
            let author = i64::try_from(author).map_err(|_| {
                AnalyticsError::InvalidFilter(format!("user id out of range: {}", author))
            })?;
            query = query.and(Predicate::eq(Field::BlogAuthorId, author));
        }

        let buckets: Vec<Bucket> = self
            .store
            .count_by_period(&query, compare.into())
            .await
            .inspect_err(|e| self.log_store_error(e))?
            .into_iter()
            .map(Bucket::from)
            .collect();
        let rows = compute_growth(&buckets, self.config.first_period_growth)?;

        tracing::debug!(
            compare = %compare,
            user = ?user_filter,
            buckets = buckets.len(),
            "performance computed"
        );

        Ok(rows.into_iter().map(PerformanceRow::from).collect())
    }

    fn base_query(&self, filters: &[RawPredicate]) -> Result<EventQuery> {
        build_query(&EventQuery::all(), filters, self.config.operator_policy)
    }

    async fn groups(&self, query: &EventQuery, dimension: Dimension) -> Result<Vec<GroupRow>> {
        let counts = self
            .store
            .count_by_dimension(query, dimension.into())
            .await
            .inspect_err(|e| self.log_store_error(e))?;
        Ok(counts.into_iter().map(GroupRow::from).collect())
    }

    fn log_store_error(&self, error: &StoreError) {
        tracing::error!(store = self.store.name(), error = %error, "event store query failed");
    }
}
