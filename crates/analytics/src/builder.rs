//! Query building from raw filter descriptions
//!
//! Turns untyped predicates and a relative time range into an
//! [`EventQuery`]. Every function returns a new query and leaves its input
//! untouched.

use chrono::{DateTime, Utc};
use viewstat_query::EventQuery;

use crate::error::Result;
use crate::filter::{OperatorPolicy, RawPredicate};
use crate::timerange::TimeRange;

/// AND each raw predicate onto `base`
///
/// Unknown fields and malformed values are rejected. Unknown operators are
/// dropped or rejected according to `policy`.
pub fn build_query(
    base: &EventQuery,
    predicates: &[RawPredicate],
    policy: OperatorPolicy,
) -> Result<EventQuery> {
    let mut query = base.clone();
    for raw in predicates {
        if let Some(predicate) = raw.resolve(policy)? {
            query = query.and(predicate);
        }
    }
    Ok(query)
}

/// Restrict `query` to `viewed_at >= now - range`
///
/// [`TimeRange::All`] returns the query unchanged.
pub fn apply_time_range(query: &EventQuery, range: TimeRange, now: DateTime<Utc>) -> EventQuery {
    match range.lower_bound(now) {
        Some(bound) => query.since(bound),
        None => query.clone(),
    }
}
