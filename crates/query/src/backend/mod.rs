//! Event store trait and implementations

pub mod clickhouse;
pub mod memory;

use async_trait::async_trait;

use crate::aggregate::{
    DimensionCount, GroupDimension, Period, PeriodCount, count_by_dimension, count_by_period,
};
use crate::error::StoreError;
use crate::event::ViewEvent;
use crate::filter::EventQuery;

/// A queryable, read-only source of view events
///
/// Implemented by the in-memory and ClickHouse stores. Every call reads a
/// point-in-time snapshot; stores never mutate events.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Fetch the events matching `query`, ordered by `(viewed_at, id)`
    async fn query(&self, query: &EventQuery) -> Result<Vec<ViewEvent>, StoreError>;

    /// Count matching events per calendar period, ascending
    ///
    /// The default fetches the events and counts them in process. Stores
    /// that can group server-side override it.
    async fn count_by_period(
        &self,
        query: &EventQuery,
        period: Period,
    ) -> Result<Vec<PeriodCount>, StoreError> {
        let events = self.query(query).await?;
        Ok(count_by_period(&events, period))
    }

    /// Count matching events per dimension value, in first-seen order
    async fn count_by_dimension(
        &self,
        query: &EventQuery,
        dimension: GroupDimension,
    ) -> Result<Vec<DimensionCount>, StoreError> {
        let events = self.query(query).await?;
        Ok(count_by_dimension(&events, dimension))
    }

    /// Check if the store is reachable
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}

/// Reject anything but a single read-only statement
///
/// Generated queries pass through here before they reach a store, so a bug
/// in SQL generation cannot turn into a write. Keywords inside quoted
/// literals are ignored.
pub fn validate_sql(sql: &str) -> Result<(), StoreError> {
    let code = strip_literals(sql.trim());
    let upper = code.to_uppercase();

    if !upper.starts_with("SELECT") && !upper.starts_with("WITH") {
        return Err(StoreError::InvalidSql(
            "only SELECT and WITH queries are allowed".to_string(),
        ));
    }

    if upper.contains(" INTO ") {
        return Err(StoreError::InvalidSql(
            "SELECT INTO is not allowed".to_string(),
        ));
    }

    // A trailing semicolon is tolerated
    if code.contains(';') && !code.ends_with(';') {
        return Err(StoreError::InvalidSql(
            "multiple statements not allowed".to_string(),
        ));
    }

    Ok(())
}

/// Blank out the contents of single-quoted literals
fn strip_literals(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut in_literal = false;

    while let Some(c) = chars.next() {
        if !in_literal {
            out.push(c);
            in_literal = c == '\'';
            continue;
        }
        match c {
            '\\' => {
                chars.next();
            }
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
            }
            '\'' => {
                out.push(c);
                in_literal = false;
            }
            _ => {}
        }
    }
    out
}
