//! Tests for the ClickHouse store

use chrono::{TimeZone, Utc};

use super::sql::{
    count_by_dimension, count_by_period, escape_identifier, escape_string, predicate_to_sql,
    select_events,
};
use super::*;
use crate::field::Field;
use crate::filter::{Operator, Predicate};

// =============================================================================
// SQL Generation Tests
// =============================================================================

#[test]
fn test_select_all_events() {
    let sql = select_events("blog_views", &EventQuery::all());
    assert!(sql.starts_with("SELECT id, viewed_at, blog_id, blog_title"));
    assert!(sql.contains(" FROM blog_views"));
    assert!(!sql.contains("WHERE"));
    assert!(sql.ends_with("ORDER BY viewed_at, id"));
    assert!(validate_sql(&sql).is_ok());
}

#[test]
fn test_select_with_bound_and_predicates() {
    let bound = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
    let query = EventQuery::all()
        .and(Predicate::eq(Field::BlogAuthorId, 1i64))
        .since(bound);
    let sql = select_events("blog_views", &query);
    assert!(sql.contains(
        "WHERE viewed_at >= toDateTime64('2025-10-01 00:00:00.000000', 6, 'UTC') \
         AND blog_author_id = 1"
    ));
}

#[test]
fn test_lower_bound_keeps_sub_seconds() {
    let bound = Utc.with_ymd_and_hms(2025, 10, 1, 8, 30, 15).unwrap()
        + chrono::Duration::microseconds(250_000);
    let sql = select_events("blog_views", &EventQuery::all().since(bound));
    assert!(sql.contains("viewed_at >= toDateTime64('2025-10-01 08:30:15.250000', 6, 'UTC')"));
}

#[test]
fn test_lower_bound_rounds_up_to_microsecond() {
    // An event stored at .000001 is before a bound of .0000015
    let bound = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap()
        + chrono::Duration::nanoseconds(1_500);
    let sql = select_events("blog_views", &EventQuery::all().since(bound));
    assert!(sql.contains("viewed_at >= toDateTime64('2025-10-01 00:00:00.000002', 6, 'UTC')"));
}

#[test]
fn test_eq_integer_and_text_literals() {
    assert_eq!(predicate_to_sql(&Predicate::eq(Field::BlogId, "7")), "blog_id = 7");
    assert_eq!(
        predicate_to_sql(&Predicate::eq(Field::ViewerCountryCode, "ET")),
        "viewer_country_code = 'ET'"
    );
}

#[test]
fn test_negations_include_nulls() {
    let neq = Predicate::new(Field::UserId, Operator::Neq, 4i64).unwrap();
    assert_eq!(predicate_to_sql(&neq), "(user_id IS NULL OR user_id != 4)");

    let nin = Predicate::new(Field::ViewerCountryCode, Operator::Nin, vec!["ET", "US"]).unwrap();
    assert_eq!(
        predicate_to_sql(&nin),
        "(viewer_country_code IS NULL OR viewer_country_code NOT IN ('ET', 'US'))"
    );
}

#[test]
fn test_empty_lists_compile_to_constants() {
    let empty: Vec<i64> = Vec::new();
    let in_empty = Predicate::new(Field::BlogId, Operator::In, empty.clone()).unwrap();
    let nin_empty = Predicate::new(Field::BlogId, Operator::Nin, empty).unwrap();
    assert_eq!(predicate_to_sql(&in_empty), "0");
    assert_eq!(predicate_to_sql(&nin_empty), "1");
}

#[test]
fn test_uncoercible_values_compile_to_constants() {
    assert_eq!(predicate_to_sql(&Predicate::eq(Field::BlogId, "seven")), "0");
    let neq = Predicate::new(Field::BlogId, Operator::Neq, "seven").unwrap();
    assert_eq!(predicate_to_sql(&neq), "1");

    // Uncoercible list members are dropped
    let mixed = Predicate::is_in(Field::BlogId, vec!["1", "x", "3"]);
    assert_eq!(predicate_to_sql(&mixed), "blog_id IN (1, 3)");
}

#[test]
fn test_timestamp_comparison() {
    let gt = Predicate::new(Field::ViewedAt, Operator::Gt, "2025-10-01").unwrap();
    assert_eq!(
        predicate_to_sql(&gt),
        "viewed_at > toDateTime64('2025-10-01 00:00:00.000000', 6, 'UTC')"
    );
}

#[test]
fn test_text_literals_are_escaped() {
    let p = Predicate::eq(Field::BlogTitle, "it's a \\ test");
    assert_eq!(predicate_to_sql(&p), "blog_title = 'it''s a \\\\ test'");
}

#[test]
fn test_escape_helpers() {
    assert_eq!(escape_string("O'Brien"), "O''Brien");
    assert_eq!(escape_identifier("blog_views"), "blog_views");
    assert_eq!(escape_identifier("analytics.blog_views"), "analytics.blog_views");
    assert_eq!(escape_identifier("views; DROP"), "`views; DROP`");
}

// =============================================================================
// Grouped Count SQL Tests
// =============================================================================

#[test]
fn test_count_by_day() {
    let sql = count_by_period("blog_views", &EventQuery::all(), Period::Day);
    assert_eq!(
        sql,
        "SELECT toString(toStartOfDay(toTimeZone(viewed_at, 'UTC'))) AS period, \
         count() AS event_count, uniqExact(blog_id) AS distinct_blogs \
         FROM blog_views GROUP BY period ORDER BY period"
    );
    assert!(validate_sql(&sql).is_ok());
}

#[test]
fn test_count_by_week_month_year() {
    let query = EventQuery::all();
    let week = count_by_period("blog_views", &query, Period::Week);
    let month = count_by_period("blog_views", &query, Period::Month);
    let year = count_by_period("blog_views", &query, Period::Year);

    assert!(week.starts_with("SELECT toString(toMonday(toTimeZone(viewed_at, 'UTC'))) AS period"));
    assert!(month.starts_with("SELECT toString(toStartOfMonth(toTimeZone(viewed_at, 'UTC')))"));
    assert!(year.starts_with("SELECT toString(toStartOfYear(toTimeZone(viewed_at, 'UTC')))"));
    for sql in [&week, &month, &year] {
        assert!(sql.ends_with(" GROUP BY period ORDER BY period"));
        assert!(validate_sql(sql).is_ok());
    }
}

#[test]
fn test_count_by_period_pushes_down_filters() {
    let bound = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
    let query = EventQuery::all()
        .and(Predicate::eq(Field::BlogAuthorId, 1i64))
        .since(bound);
    let sql = count_by_period("blog_views", &query, Period::Month);
    assert!(sql.contains(
        " FROM blog_views WHERE viewed_at >= toDateTime64('2025-10-01 00:00:00.000000', 6, 'UTC') \
         AND blog_author_id = 1 GROUP BY period"
    ));
}

#[test]
fn test_count_by_country() {
    let sql = count_by_dimension("blog_views", &EventQuery::all(), GroupDimension::ViewerCountry);
    assert_eq!(
        sql,
        "SELECT multiIf(ifNull(viewer_country_code, '') = '', 'Unknown', \
         viewer_country_name IS NULL, viewer_country_code, \
         viewer_country_name = '', 'Unknown', viewer_country_name) AS label, \
         count() AS event_count, uniqExact(blog_id) AS distinct_blogs \
         FROM blog_views GROUP BY label ORDER BY min((viewed_at, id))"
    );
    assert!(validate_sql(&sql).is_ok());
}

#[test]
fn test_count_by_user() {
    let sql = count_by_dimension("blog_views", &EventQuery::all(), GroupDimension::ViewerUser);
    assert!(sql.starts_with(
        "SELECT multiIf(user_id IS NULL, 'Unknown', ifNull(user_username, '') = '', 'Unknown', \
         user_username) AS label"
    ));
    assert!(sql.ends_with(" GROUP BY label ORDER BY min((viewed_at, id))"));
    assert!(validate_sql(&sql).is_ok());
}

#[test]
fn test_count_by_blog() {
    let query = EventQuery::all().and(Predicate::eq(Field::ViewerCountryCode, "ET"));
    let sql = count_by_dimension("blog_views", &query, GroupDimension::Blog);
    assert_eq!(
        sql,
        "SELECT argMin(blog_title, (viewed_at, id)) AS label, count() AS event_count, \
         uniqExact(blog_id) AS distinct_blogs FROM blog_views \
         WHERE viewer_country_code = 'ET' GROUP BY blog_id ORDER BY min((viewed_at, id))"
    );
    assert!(validate_sql(&sql).is_ok());
}

// =============================================================================
// Row Decoding Tests
// =============================================================================

#[test]
fn test_parse_full_row() {
    let body = r#"{"id":1,"viewed_at":"2025-10-01T10:00:00Z","blog_id":2,"blog_title":"Post","blog_author_id":3,"blog_author_username":"user3","blog_country_code":"ET","blog_country_name":"Ethiopia","user_id":4,"user_username":"user4","viewer_country_code":"US","viewer_country_name":"United States"}"#;
    let events = parse_rows(body).unwrap();
    assert_eq!(events.len(), 1);

    let e = &events[0];
    assert_eq!(e.viewed_at, Utc.with_ymd_and_hms(2025, 10, 1, 10, 0, 0).unwrap());
    assert_eq!(e.blog.author.id, 3);
    assert_eq!(e.blog.country.as_ref().unwrap().name, "Ethiopia");
    assert_eq!(e.user.as_ref().unwrap().username, "user4");
    assert_eq!(e.viewer_country.as_ref().unwrap().code, "US");
}

#[test]
fn test_parse_row_with_nulls() {
    let body = "\n{\"id\":1,\"viewed_at\":\"2025-10-01 10:00:00\",\"blog_id\":2,\"blog_title\":\"Post\",\"blog_author_id\":3,\"blog_author_username\":\"user3\",\"blog_country_code\":null,\"blog_country_name\":null,\"user_id\":null,\"user_username\":null,\"viewer_country_code\":\"\",\"viewer_country_name\":null}\n";
    let events = parse_rows(body).unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].user.is_none());
    assert!(events[0].blog.country.is_none());
    assert!(events[0].viewer_country.is_none());
}

#[test]
fn test_parse_empty_body() {
    assert!(parse_rows("").unwrap().is_empty());
}

#[test]
fn test_parse_bad_row() {
    let err = parse_rows(r#"{"id":"x"}"#).unwrap_err();
    assert!(matches!(err, StoreError::Serialization(_)));
}

#[test]
fn test_parse_period_rows() {
    let body = concat!(
        r#"{"period":"2025-10-01 00:00:00","event_count":3,"distinct_blogs":2}"#,
        "\n",
        r#"{"period":"2025-10-13","event_count":1,"distinct_blogs":1}"#,
        "\n",
    );
    let counts = parse_period_rows(body).unwrap();
    assert_eq!(
        counts,
        vec![
            PeriodCount {
                period: Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap(),
                event_count: 3,
                distinct_blogs: 2,
            },
            PeriodCount {
                period: Utc.with_ymd_and_hms(2025, 10, 13, 0, 0, 0).unwrap(),
                event_count: 1,
                distinct_blogs: 1,
            },
        ]
    );

    let err = parse_period_rows(r#"{"period":"soon","event_count":1,"distinct_blogs":1}"#)
        .unwrap_err();
    assert!(matches!(err, StoreError::Serialization(_)));
}

#[test]
fn test_parse_dimension_rows() {
    let body = concat!(
        r#"{"label":"Ethiopia","event_count":4,"distinct_blogs":2}"#,
        "\n",
        r#"{"label":null,"event_count":1,"distinct_blogs":1}"#,
    );
    let counts = parse_dimension_rows(body).unwrap();
    let labels: Vec<_> = counts.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["Ethiopia", UNKNOWN_LABEL]);
    assert_eq!((counts[0].event_count, counts[0].distinct_blogs), (4, 2));
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_default() {
    let config = ClickHouseStoreConfig::default();
    assert_eq!(config.url, "http://localhost:8123");
    assert_eq!(config.database, "default");
    assert_eq!(config.table, "blog_views");
    assert!(config.username.is_none());
    assert_eq!(config.max_execution_time, 60);
}

#[test]
fn test_config_builders() {
    let config = ClickHouseStoreConfig::new("http://example.com:8123", "analytics")
        .with_credentials("admin", "secret")
        .with_table("views");
    assert_eq!(config.database, "analytics");
    assert_eq!(config.username, Some("admin".to_string()));
    assert_eq!(config.table, "views");
}

#[test]
fn test_store_debug_hides_credentials() {
    let config =
        ClickHouseStoreConfig::new("http://test:8123", "mydb").with_credentials("u", "hunter2");
    let store = ClickHouseStore::new(&config).unwrap();
    let debug = format!("{:?}", store);
    assert!(debug.contains("http://test:8123"));
    assert!(debug.contains("mydb"));
    assert!(!debug.contains("hunter2"));
    assert_eq!(store.name(), "clickhouse");
}

#[tokio::test]
async fn test_connection_refused_is_unavailable() {
    let config = ClickHouseStoreConfig::new("http://127.0.0.1:1", "default");
    let store = ClickHouseStore::new(&config).unwrap();
    let err = store.query(&EventQuery::all()).await.unwrap_err();
    assert!(err.is_transient(), "expected unavailable, got {:?}", err);

    let err = store
        .count_by_dimension(&EventQuery::all(), GroupDimension::Blog)
        .await
        .unwrap_err();
    assert!(err.is_transient(), "expected unavailable, got {:?}", err);
}

// =============================================================================
// Integration Tests (require running ClickHouse)
// =============================================================================

#[tokio::test]
#[ignore = "requires running ClickHouse instance"]
async fn test_health_check() {
    let store = ClickHouseStore::new(&ClickHouseStoreConfig::default()).unwrap();
    let result = store.health_check().await;
    assert!(result.is_ok(), "health check failed: {:?}", result);
}
