//! Tests for time range parsing

use chrono::{Duration, TimeZone, Utc};

use crate::timerange::TimeRange;

#[test]
fn test_parse_keywords() {
    assert_eq!(TimeRange::parse("day"), TimeRange::Day);
    assert_eq!(TimeRange::parse("week"), TimeRange::Week);
    assert_eq!(TimeRange::parse("Month"), TimeRange::Month);
    assert_eq!(TimeRange::parse(" year "), TimeRange::Year);
    assert_eq!(TimeRange::parse("all"), TimeRange::All);
}

#[test]
fn test_parse_shorthands() {
    assert_eq!(TimeRange::parse("1d"), TimeRange::Day);
    assert_eq!(TimeRange::parse("7d"), TimeRange::Week);
    assert_eq!(TimeRange::parse("30d"), TimeRange::Month);
    assert_eq!(TimeRange::parse("365d"), TimeRange::Year);
}

#[test]
fn test_unrecognized_means_all_time() {
    assert_eq!(TimeRange::parse("fortnight"), TimeRange::All);
    assert_eq!(TimeRange::parse(""), TimeRange::All);
    assert_eq!("decade".parse::<TimeRange>().unwrap(), TimeRange::All);
}

#[test]
fn test_fixed_durations() {
    assert_eq!(TimeRange::Day.duration(), Some(Duration::days(1)));
    assert_eq!(TimeRange::Week.duration(), Some(Duration::days(7)));
    assert_eq!(TimeRange::Month.duration(), Some(Duration::days(30)));
    assert_eq!(TimeRange::Year.duration(), Some(Duration::days(365)));
    assert_eq!(TimeRange::All.duration(), None);
}

#[test]
fn test_lower_bound() {
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    // 30 days, not a calendar month
    assert_eq!(
        TimeRange::Month.lower_bound(now),
        Some(Utc.with_ymd_and_hms(2025, 1, 30, 12, 0, 0).unwrap())
    );
    assert_eq!(TimeRange::All.lower_bound(now), None);
}

#[test]
fn test_default_is_month() {
    assert_eq!(TimeRange::default(), TimeRange::Month);
}

#[test]
fn test_display() {
    assert_eq!(TimeRange::Week.to_string(), "week");
    assert_eq!(TimeRange::All.to_string(), "all");
}
