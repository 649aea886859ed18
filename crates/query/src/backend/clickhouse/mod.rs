//! ClickHouse event store
//!
//! Reads view events from a flat ClickHouse table over the HTTP interface.
//! Predicates are pushed down as a WHERE clause; rows come back as
//! `JSONEachRow` and are reassembled into [`ViewEvent`]s. Period and
//! dimension counts run as `GROUP BY` on the server.

pub mod sql;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::aggregate::{DimensionCount, GroupDimension, Period, PeriodCount, UNKNOWN_LABEL};
use crate::backend::{EventStore, validate_sql};
use crate::error::StoreError;
use crate::event::{Blog, Country, UserRef, ViewEvent};
use crate::field::parse_timestamp;
use crate::filter::EventQuery;

// =============================================================================
// Configuration
// =============================================================================

/// ClickHouse store configuration
#[derive(Debug, Clone)]
pub struct ClickHouseStoreConfig {
    /// ClickHouse HTTP URL (e.g., "http://localhost:8123")
    pub url: String,

    /// Database name
    pub database: String,

    /// Table holding one row per view
    pub table: String,

    /// Username for authentication (optional)
    pub username: Option<String>,

    /// Password for authentication (optional)
    pub password: Option<String>,

    /// Max execution time in seconds
    pub max_execution_time: u64,
}

impl Default for ClickHouseStoreConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8123".into(),
            database: "default".into(),
            table: "blog_views".into(),
            username: None,
            password: None,
            max_execution_time: 60,
        }
    }
}

impl ClickHouseStoreConfig {
    /// Create a new config with URL and database
    pub fn new(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Default::default()
        }
    }

    /// Set authentication credentials
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Read from a different table
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }
}

// =============================================================================
// Store Implementation
// =============================================================================

/// Event store backed by ClickHouse
#[derive(Clone)]
pub struct ClickHouseStore {
    client: reqwest::Client,
    config: ClickHouseStoreConfig,
}

impl std::fmt::Debug for ClickHouseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickHouseStore")
            .field("url", &self.config.url)
            .field("database", &self.config.database)
            .field("table", &self.config.table)
            .finish()
    }
}

impl ClickHouseStore {
    /// Create a new ClickHouse store from config
    ///
    /// No connection is made until the first query.
    pub fn new(config: &ClickHouseStoreConfig) -> Result<Self, StoreError> {
        // Leave the server room to report its own timeout first
        let timeout = Duration::from_secs(config.max_execution_time.saturating_add(5));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Execute a statement and return the raw response body
    async fn execute_query(&self, sql: &str) -> Result<String, StoreError> {
        let max_execution_time = self.config.max_execution_time.to_string();
        let params = [
            ("database", self.config.database.as_str()),
            ("max_execution_time", max_execution_time.as_str()),
            ("date_time_output_format", "iso"),
            ("output_format_json_quote_64bit_integers", "0"),
        ];

        let mut request = self
            .client
            .post(&self.config.url)
            .query(&params)
            .body(sql.to_string());

        if let Some(user) = &self.config.username {
            request = request.basic_auth(user, self.config.password.as_ref());
        }

        let response = request.send().await.map_err(|e| {
            StoreError::Unavailable(format!("ClickHouse connection failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Execution(format!(
                "ClickHouse error ({}): {}",
                status,
                body.trim()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| StoreError::Execution(format!("failed to read response: {}", e)))
    }

    /// Validate and run a SELECT, returning `JSONEachRow` output
    async fn fetch_rows(&self, sql: &str) -> Result<String, StoreError> {
        validate_sql(sql)?;
        self.execute_query(&format!("{} FORMAT JSONEachRow", sql)).await
    }
}

#[async_trait]
impl EventStore for ClickHouseStore {
    async fn query(&self, query: &EventQuery) -> Result<Vec<ViewEvent>, StoreError> {
        let sql = sql::select_events(&self.config.table, query);

        let start = Instant::now();
        let body = self.fetch_rows(&sql).await?;
        let events = parse_rows(&body)?;

        tracing::debug!(
            rows = events.len(),
            predicates = query.predicates().len(),
            time_ms = start.elapsed().as_millis() as u64,
            "ClickHouse query executed"
        );

        Ok(events)
    }

    async fn count_by_period(
        &self,
        query: &EventQuery,
        period: Period,
    ) -> Result<Vec<PeriodCount>, StoreError> {
        let sql = sql::count_by_period(&self.config.table, query, period);

        let start = Instant::now();
        let body = self.fetch_rows(&sql).await?;
        let counts = parse_period_rows(&body)?;

        tracing::debug!(
            ?period,
            groups = counts.len(),
            time_ms = start.elapsed().as_millis() as u64,
            "ClickHouse period counts executed"
        );

        Ok(counts)
    }

    async fn count_by_dimension(
        &self,
        query: &EventQuery,
        dimension: GroupDimension,
    ) -> Result<Vec<DimensionCount>, StoreError> {
        let sql = sql::count_by_dimension(&self.config.table, query, dimension);

        let start = Instant::now();
        let body = self.fetch_rows(&sql).await?;
        let counts = parse_dimension_rows(&body)?;

        tracing::debug!(
            ?dimension,
            groups = counts.len(),
            time_ms = start.elapsed().as_millis() as u64,
            "ClickHouse dimension counts executed"
        );

        Ok(counts)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.execute_query("SELECT 1").await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "clickhouse"
    }
}

// =============================================================================
// Row Decoding
// =============================================================================

/// One `JSONEachRow` line of the view table
#[derive(Debug, Deserialize)]
struct ViewRow {
    id: u64,
    viewed_at: String,
    blog_id: u64,
    blog_title: String,
    blog_author_id: u64,
    blog_author_username: String,
    blog_country_code: Option<String>,
    blog_country_name: Option<String>,
    user_id: Option<u64>,
    user_username: Option<String>,
    viewer_country_code: Option<String>,
    viewer_country_name: Option<String>,
}

impl TryFrom<ViewRow> for ViewEvent {
    type Error = StoreError;

    fn try_from(row: ViewRow) -> Result<Self, Self::Error> {
        let viewed_at = parse_timestamp(&row.viewed_at).ok_or_else(|| {
            StoreError::Serialization(format!("invalid viewed_at: {}", row.viewed_at))
        })?;

        Ok(ViewEvent {
            id: row.id,
            viewed_at,
            blog: Blog {
                id: row.blog_id,
                title: row.blog_title,
                author: UserRef {
                    id: row.blog_author_id,
                    username: row.blog_author_username,
                },
                country: country(row.blog_country_code, row.blog_country_name),
            },
            user: row.user_id.map(|id| UserRef {
                id,
                username: row.user_username.unwrap_or_default(),
            }),
            viewer_country: country(row.viewer_country_code, row.viewer_country_name),
        })
    }
}

/// A country needs a code; a missing name falls back to the code
fn country(code: Option<String>, name: Option<String>) -> Option<Country> {
    let code = code.filter(|c| !c.is_empty())?;
    let name = name.unwrap_or_else(|| code.clone());
    Some(Country { code, name })
}

/// One row of a period count
#[derive(Debug, Deserialize)]
struct PeriodRow {
    period: String,
    event_count: u64,
    distinct_blogs: u64,
}

impl TryFrom<PeriodRow> for PeriodCount {
    type Error = StoreError;

    fn try_from(row: PeriodRow) -> Result<Self, Self::Error> {
        let period = parse_timestamp(&row.period).ok_or_else(|| {
            StoreError::Serialization(format!("invalid period: {}", row.period))
        })?;
        Ok(PeriodCount {
            period,
            event_count: row.event_count,
            distinct_blogs: row.distinct_blogs,
        })
    }
}

/// One row of a dimension count
#[derive(Debug, Deserialize)]
struct DimensionRow {
    label: Option<String>,
    event_count: u64,
    distinct_blogs: u64,
}

impl From<DimensionRow> for DimensionCount {
    fn from(row: DimensionRow) -> Self {
        DimensionCount {
            label: row.label.unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            event_count: row.event_count,
            distinct_blogs: row.distinct_blogs,
        }
    }
}

fn parse_json_lines<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, StoreError> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str(line).map_err(|e| {
                StoreError::Serialization(format!("failed to parse JSON row: {}", e))
            })
        })
        .collect()
}

fn parse_rows(body: &str) -> Result<Vec<ViewEvent>, StoreError> {
    parse_json_lines::<ViewRow>(body)?
        .into_iter()
        .map(ViewEvent::try_from)
        .collect()
}

fn parse_period_rows(body: &str) -> Result<Vec<PeriodCount>, StoreError> {
    parse_json_lines::<PeriodRow>(body)?
        .into_iter()
        .map(PeriodCount::try_from)
        .collect()
}

fn parse_dimension_rows(body: &str) -> Result<Vec<DimensionCount>, StoreError> {
    Ok(parse_json_lines::<DimensionRow>(body)?
        .into_iter()
        .map(DimensionCount::from)
        .collect())
}

#[cfg(test)]
#[path = "clickhouse_test.rs"]
mod clickhouse_test;
