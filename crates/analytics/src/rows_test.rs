//! Tests for result row types

use serde_json::json;

use crate::aggregate::GroupRow;
use crate::growth::GrowthRow;
use crate::rows::{AnalyticsRow, PerformanceRow, total_views};

#[test]
fn test_analytics_row_from_group() {
    let row = AnalyticsRow::from(GroupRow {
        label: "Ethiopia".into(),
        distinct_entity_count: 12,
        event_count: 1200,
    });
    assert_eq!(row, AnalyticsRow::new("Ethiopia", 12, 1200));
}

#[test]
fn test_analytics_row_wire_shape() {
    let value = serde_json::to_value(AnalyticsRow::new("alice", 5, 520)).unwrap();
    assert_eq!(value, json!({"x": "alice", "y": 5, "z": 520}));
}

#[test]
fn test_performance_row_from_growth() {
    let row = PerformanceRow::from(GrowthRow {
        label: "2025-10-01 (5 blogs)".into(),
        value: 120,
        growth_pct: Some(10.0),
        distinct_entity_count: 5,
    });
    assert_eq!(row.x, "2025-10-01 (5 blogs)");
    assert_eq!(row.y, 120);
    assert_eq!(row.z, Some(10.0));
}

#[test]
fn test_performance_row_null_growth_serializes_as_null() {
    let row = PerformanceRow {
        x: "2025-10-01 (1 blogs)".into(),
        y: 3,
        z: None,
    };
    let value = serde_json::to_value(&row).unwrap();
    assert_eq!(value, json!({"x": "2025-10-01 (1 blogs)", "y": 3, "z": null}));
}

#[test]
fn test_total_views() {
    let rows = vec![AnalyticsRow::new("a", 1, 2), AnalyticsRow::new("b", 1, 5)];
    assert_eq!(total_views(&rows), 7);
    assert_eq!(total_views(&[]), 0);
}
