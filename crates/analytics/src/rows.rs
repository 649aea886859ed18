//! Result row types
//!
//! Rows serialize as `{x, y, z}`; the field names are a wire contract
//! shared by every operation.

use serde::{Deserialize, Serialize};

use crate::aggregate::GroupRow;
use crate::growth::GrowthRow;

/// A grouped or ranked row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsRow {
    /// Group label (country name, username, blog title)
    pub x: String,
    /// Distinct blogs viewed
    pub y: u64,
    /// Total views
    pub z: u64,
}

impl AnalyticsRow {
    pub fn new(x: impl Into<String>, y: u64, z: u64) -> Self {
        Self { x: x.into(), y, z }
    }
}

impl From<GroupRow> for AnalyticsRow {
    fn from(row: GroupRow) -> Self {
        Self {
            x: row.label,
            y: row.distinct_entity_count,
            z: row.event_count,
        }
    }
}

/// A period row with growth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    /// `YYYY-MM-DD (N blogs)`
    pub x: String,
    /// Total views in the period
    pub y: u64,
    /// Growth percent over the previous period, `null` without a baseline
    pub z: Option<f64>,
}

impl From<GrowthRow> for PerformanceRow {
    fn from(row: GrowthRow) -> Self {
        Self {
            x: row.label,
            y: row.value,
            z: row.growth_pct,
        }
    }
}

/// Sum of the view counts across rows
pub fn total_views(rows: &[AnalyticsRow]) -> u64 {
    rows.iter().map(|r| r.z).sum()
}
