//! Tests for granularity, dimensions and raw predicates

use viewstat_query::{PredicateValue, Scalar};

use crate::error::AnalyticsError;
use crate::filter::{Dimension, Granularity, OperatorPolicy, RawPredicate};

#[test]
fn test_granularity_parse() {
    assert_eq!(Granularity::parse("day").unwrap(), Granularity::Day);
    assert_eq!(Granularity::parse("daily").unwrap(), Granularity::Day);
    assert_eq!(Granularity::parse("week").unwrap(), Granularity::Week);
    assert_eq!(Granularity::parse("1w").unwrap(), Granularity::Week);
    assert_eq!(Granularity::parse("Month").unwrap(), Granularity::Month);
    assert_eq!(Granularity::parse("yearly").unwrap(), Granularity::Year);
}

#[test]
fn test_granularity_parse_invalid() {
    let err = Granularity::parse("quarter").unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidGranularity(ref s) if s == "quarter"));
    assert!(err.is_client_error());
    assert!(Granularity::parse("").is_err());
}

#[test]
fn test_granularity_serde() {
    let json = serde_json::to_string(&Granularity::Week).unwrap();
    assert_eq!(json, "\"week\"");
    let g: Granularity = serde_json::from_str("\"year\"").unwrap();
    assert_eq!(g, Granularity::Year);
}

#[test]
fn test_dimension_parse() {
    assert_eq!(Dimension::parse("country").unwrap(), Dimension::Country);
    assert_eq!(Dimension::parse("viewer_country").unwrap(), Dimension::Country);
    assert_eq!(Dimension::parse("USER").unwrap(), Dimension::User);
    assert_eq!(Dimension::parse("blog").unwrap(), Dimension::Blog);
    assert_eq!("viewed_entity".parse::<Dimension>().unwrap(), Dimension::Blog);
}

#[test]
fn test_dimension_parse_invalid() {
    let err = Dimension::parse("city").unwrap_err();
    assert_eq!(err.to_string(), "invalid grouping dimension: city");
    assert!(err.is_client_error());
}

#[test]
fn test_operator_policy_parse() {
    assert_eq!("lenient".parse::<OperatorPolicy>().unwrap(), OperatorPolicy::Lenient);
    assert_eq!("STRICT".parse::<OperatorPolicy>().unwrap(), OperatorPolicy::Strict);
    let err = "loose".parse::<OperatorPolicy>().unwrap_err();
    assert!(err.contains("unknown operator policy: loose"));
    assert_eq!(OperatorPolicy::default(), OperatorPolicy::Lenient);
}

#[test]
fn test_raw_predicate_from_str_scalar() {
    let raw: RawPredicate = "blog.author.id:eq:1".parse().unwrap();
    assert_eq!(raw.field, "blog.author.id");
    assert_eq!(raw.op, "eq");
    assert_eq!(raw.value, PredicateValue::Single(Scalar::Int(1)));
}

#[test]
fn test_raw_predicate_from_str_list() {
    let raw: RawPredicate = "viewer_country.code:nin:ET, US".parse().unwrap();
    assert_eq!(
        raw.value,
        PredicateValue::List(vec![Scalar::Text("ET".into()), Scalar::Text("US".into())])
    );
}

#[test]
fn test_raw_predicate_from_str_keeps_colons_in_value() {
    let raw: RawPredicate = "viewed_at:gt:2025-10-01T10:00:00Z".parse().unwrap();
    assert_eq!(raw.field, "viewed_at");
    assert_eq!(
        raw.value,
        PredicateValue::Single(Scalar::Text("2025-10-01T10:00:00Z".into()))
    );
}

#[test]
fn test_raw_predicate_from_str_invalid() {
    let err = "blog.id=1".parse::<RawPredicate>().unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidFilter(_)));
}

#[test]
fn test_resolve_unknown_operator() {
    let raw = RawPredicate::new("blog.id", "like", "x");
    assert!(raw.resolve(OperatorPolicy::Lenient).unwrap().is_none());
    assert!(raw.resolve(OperatorPolicy::Strict).is_err());
}
