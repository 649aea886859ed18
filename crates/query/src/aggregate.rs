//! Grouped view counts
//!
//! The two groupings every store answers: calendar periods and viewer or
//! blog dimensions. Each group carries its event count and the number of
//! distinct blogs viewed. The functions here are the reference semantics;
//! the memory store runs them directly and the ClickHouse store compiles the
//! same groupings to `GROUP BY`.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Datelike, Days, NaiveTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::event::ViewEvent;

/// Label for events missing the grouped value
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Calendar period used to bucket events (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Day,
    /// Weeks start on Monday
    Week,
    Month,
    Year,
}

/// What a dimension grouping keys on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupDimension {
    /// Viewer country, labelled by name
    ViewerCountry,
    /// Signed-in viewer, labelled by username
    ViewerUser,
    /// Viewed blog, keyed by id and labelled by title
    Blog,
}

/// Counts for one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodCount {
    /// Start of the period (UTC midnight)
    pub period: DateTime<Utc>,
    pub event_count: u64,
    pub distinct_blogs: u64,
}

/// Counts for one dimension value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionCount {
    pub label: String,
    pub event_count: u64,
    pub distinct_blogs: u64,
}

/// Truncate a timestamp to the start of its period
pub fn truncate(ts: DateTime<Utc>, period: Period) -> DateTime<Utc> {
    let date = ts.date_naive();
    let back = match period {
        Period::Day => 0,
        Period::Week => date.weekday().num_days_from_monday(),
        Period::Month => date.day0(),
        Period::Year => date.ordinal0(),
    };
    (date - Days::new(u64::from(back)))
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// Count events per period, ascending
///
/// Periods without events are absent; no zero-filled buckets are emitted.
pub fn count_by_period(events: &[ViewEvent], period: Period) -> Vec<PeriodCount> {
    let mut periods: BTreeMap<DateTime<Utc>, (u64, HashSet<u64>)> = BTreeMap::new();

    for event in events {
        let entry = periods.entry(truncate(event.viewed_at, period)).or_default();
        entry.0 += 1;
        entry.1.insert(event.blog.id);
    }

    periods
        .into_iter()
        .map(|(period, (count, blogs))| PeriodCount {
            period,
            event_count: count,
            distinct_blogs: blogs.len() as u64,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Blog(u64),
    Label(String),
}

#[derive(Default)]
struct GroupAcc {
    label: String,
    events: u64,
    blogs: HashSet<u64>,
}

/// Count events per dimension value, in first-seen order
///
/// `events` must be in store order `(viewed_at, id)`; groups appear in the
/// order of their earliest event. Missing or empty values group under
/// [`UNKNOWN_LABEL`].
pub fn count_by_dimension(events: &[ViewEvent], dimension: GroupDimension) -> Vec<DimensionCount> {
    let mut groups: IndexMap<GroupKey, GroupAcc> = IndexMap::new();

    for event in events {
        let (key, label) = match dimension {
            GroupDimension::ViewerCountry => {
                label_key(event.viewer_country.as_ref().map(|c| &c.name))
            }
            GroupDimension::ViewerUser => label_key(event.user.as_ref().map(|u| &u.username)),
            GroupDimension::Blog => (GroupKey::Blog(event.blog.id), event.blog.title.as_str()),
        };

        let acc = groups.entry(key).or_insert_with(|| GroupAcc {
            label: label.to_string(),
            ..Default::default()
        });
        acc.events += 1;
        acc.blogs.insert(event.blog.id);
    }

    groups
        .into_values()
        .map(|acc| DimensionCount {
            label: acc.label,
            event_count: acc.events,
            distinct_blogs: acc.blogs.len() as u64,
        })
        .collect()
}

fn label_key(value: Option<&String>) -> (GroupKey, &str) {
    let label = value
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_LABEL);
    (GroupKey::Label(label.to_string()), label)
}
