//! Period bucketing and dimension grouping
//!
//! Both aggregations count events and distinct viewed blogs. The counting
//! itself lives in `viewstat-query` so every store shares it; this module
//! maps the analytics vocabulary onto it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use viewstat_query::{DimensionCount, GroupDimension, Period, PeriodCount, ViewEvent};

use crate::filter::{Dimension, Granularity};

pub use viewstat_query::UNKNOWN_LABEL;

/// Event counts for one calendar period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    /// Start of the period (UTC midnight)
    pub period: DateTime<Utc>,
    /// Number of events in the period
    pub event_count: u64,
    /// Number of distinct blogs viewed in the period
    pub distinct_entity_count: u64,
}

impl Bucket {
    pub fn new(period: DateTime<Utc>, event_count: u64, distinct_entity_count: u64) -> Self {
        Self {
            period,
            event_count,
            distinct_entity_count,
        }
    }
}

impl From<PeriodCount> for Bucket {
    fn from(count: PeriodCount) -> Self {
        Bucket::new(count.period, count.event_count, count.distinct_blogs)
    }
}

/// Event counts for one value of a grouping dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRow {
    pub label: String,
    pub distinct_entity_count: u64,
    pub event_count: u64,
}

impl From<DimensionCount> for GroupRow {
    fn from(count: DimensionCount) -> Self {
        GroupRow {
            label: count.label,
            distinct_entity_count: count.distinct_blogs,
            event_count: count.event_count,
        }
    }
}

impl From<Granularity> for Period {
    fn from(granularity: Granularity) -> Self {
        match granularity {
            Granularity::Day => Period::Day,
            Granularity::Week => Period::Week,
            Granularity::Month => Period::Month,
            Granularity::Year => Period::Year,
        }
    }
}

impl From<Dimension> for GroupDimension {
    fn from(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Country => GroupDimension::ViewerCountry,
            Dimension::User => GroupDimension::ViewerUser,
            Dimension::Blog => GroupDimension::Blog,
        }
    }
}

/// Truncate a timestamp to the start of its period
///
/// Weeks start on Monday. All truncation happens in UTC.
pub fn truncate(ts: DateTime<Utc>, granularity: Granularity) -> DateTime<Utc> {
    viewstat_query::truncate(ts, granularity.into())
}

/// Bucket events by period, ascending
///
/// Periods without events are absent; no zero-filled buckets are emitted.
pub fn aggregate_by_period(events: &[ViewEvent], granularity: Granularity) -> Vec<Bucket> {
    viewstat_query::count_by_period(events, granularity.into())
        .into_iter()
        .map(Bucket::from)
        .collect()
}

/// Group events by a dimension, in first-seen order
///
/// Events missing the dimension value group under [`UNKNOWN_LABEL`]. Blogs
/// are grouped by id and labelled with their title.
pub fn group_by_dimension(events: &[ViewEvent], dimension: Dimension) -> Vec<GroupRow> {
    viewstat_query::count_by_dimension(events, dimension.into())
        .into_iter()
        .map(GroupRow::from)
        .collect()
}
