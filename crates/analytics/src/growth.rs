//! Period-over-period growth
//!
//! Growth compares each bucket's event count with the bucket before it:
//! `(current - previous) / previous * 100`, rounded to two decimals with
//! halves going to the even neighbour.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::aggregate::Bucket;
use crate::error::{AnalyticsError, Result};

/// Growth reported for the first bucket, which has no baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstPeriodPolicy {
    /// No growth value
    #[default]
    Null,
    /// Report 100%
    Hundred,
}

impl FirstPeriodPolicy {
    fn first_growth(&self) -> Option<f64> {
        match self {
            Self::Null => None,
            Self::Hundred => Some(100.0),
        }
    }
}

impl FromStr for FirstPeriodPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "null" | "none" => Ok(Self::Null),
            "hundred" | "100" => Ok(Self::Hundred),
            _ => Err(format!(
                "unknown first period policy: {} (expected null or hundred)",
                s
            )),
        }
    }
}

/// A bucket annotated with growth over its predecessor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthRow {
    /// `YYYY-MM-DD (N blogs)`
    pub label: String,
    /// Event count of the bucket
    pub value: u64,
    /// Percent change from the previous bucket; `None` without a usable baseline
    pub growth_pct: Option<f64>,
    pub distinct_entity_count: u64,
}

/// Annotate ordered buckets with growth
///
/// Buckets must be strictly ascending by period. A zero baseline yields
/// `None`.
pub fn compute_growth(buckets: &[Bucket], policy: FirstPeriodPolicy) -> Result<Vec<GrowthRow>> {
    if let Some(index) = buckets
        .windows(2)
        .position(|pair| pair[1].period <= pair[0].period)
    {
        return Err(AnalyticsError::UnorderedBuckets { index: index + 1 });
    }

    let mut previous: Option<u64> = None;
    let rows = buckets
        .iter()
        .map(|bucket| {
            let growth_pct = match previous {
                None => policy.first_growth(),
                Some(baseline) => growth_pct(bucket.event_count, baseline),
            };
            previous = Some(bucket.event_count);

            GrowthRow {
                label: format!(
                    "{} ({} blogs)",
                    bucket.period.format("%Y-%m-%d"),
                    bucket.distinct_entity_count
                ),
                value: bucket.event_count,
                growth_pct,
                distinct_entity_count: bucket.distinct_entity_count,
            }
        })
        .collect();

    Ok(rows)
}

/// Percent change from `baseline` to `current`, rounded to 2 decimals
///
/// Ties round to even: 3.125 becomes 3.12.
pub fn growth_pct(current: u64, baseline: u64) -> Option<f64> {
    if baseline == 0 {
        return None;
    }
    let pct = (current as f64 - baseline as f64) / baseline as f64 * 100.0;
    Some((pct * 100.0).round_ties_even() / 100.0)
}
