//! Relative time ranges
//!
//! A range is a fixed look-back window ending at an injected `now`:
//! `day` = 1 day, `week` = 7 days, `month` = 30 days, `year` = 365 days.
//! These are durations, not calendar periods.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A look-back window for analytics queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Day,
    Week,
    /// Default for the grouping operations
    #[default]
    Month,
    Year,
    /// No lower bound
    All,
}

impl TimeRange {
    /// Parse a range keyword
    ///
    /// Unrecognized keywords mean all time.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "day" | "1d" => Self::Day,
            "week" | "7d" => Self::Week,
            "month" | "30d" => Self::Month,
            "year" | "365d" => Self::Year,
            _ => Self::All,
        }
    }

    /// Length of the window, `None` for [`TimeRange::All`]
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Self::Day => Some(Duration::days(1)),
            Self::Week => Some(Duration::days(7)),
            Self::Month => Some(Duration::days(30)),
            Self::Year => Some(Duration::days(365)),
            Self::All => None,
        }
    }

    /// Earliest included timestamp for a window ending at `now`
    pub fn lower_bound(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.duration().map(|d| now - d)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
