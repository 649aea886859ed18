//! Filter descriptions, granularity and grouping dimensions
//!
//! A [`RawPredicate`] is the untyped `{field, op, value}` form callers send.
//! It is resolved into a typed [`Predicate`] by the query builder under an
//! [`OperatorPolicy`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use viewstat_query::{Field, Predicate, PredicateValue, Scalar};

use crate::error::{AnalyticsError, Result};

/// An unresolved filter predicate
///
/// `op` defaults to `eq` when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPredicate {
    /// Field path (`blog.author.id` or `blog__author__id`)
    pub field: String,
    /// Operator keyword
    #[serde(default = "default_op", alias = "operator")]
    pub op: String,
    /// Scalar or list value
    pub value: PredicateValue,
}

fn default_op() -> String {
    "eq".to_string()
}

impl RawPredicate {
    pub fn new(
        field: impl Into<String>,
        op: impl Into<String>,
        value: impl Into<PredicateValue>,
    ) -> Self {
        Self {
            field: field.into(),
            op: op.into(),
            value: value.into(),
        }
    }

    /// Resolve into a typed predicate
    ///
    /// Returns `Ok(None)` when the operator is unknown and the policy is
    /// lenient.
    pub fn resolve(&self, policy: OperatorPolicy) -> Result<Option<Predicate>> {
        let field =
            Field::parse(&self.field).map_err(|e| AnalyticsError::InvalidFilter(e.to_string()))?;

        let Some(operator) = viewstat_query::Operator::parse(&self.op) else {
            return match policy {
                OperatorPolicy::Lenient => {
                    tracing::warn!(
                        field = %self.field,
                        op = %self.op,
                        "dropping predicate with unknown operator"
                    );
                    Ok(None)
                }
                OperatorPolicy::Strict => Err(AnalyticsError::InvalidOperator(format!(
                    "{} (on {})",
                    self.op, self.field
                ))),
            };
        };

        Predicate::new(field, operator, self.value.clone())
            .map(Some)
            .map_err(|e| AnalyticsError::InvalidFilter(e.to_string()))
    }
}

/// Parse `field:op:value`
///
/// List operators (`in`, `nin`) split the value on commas. Integer-looking
/// values become integers; everything else is text.
impl FromStr for RawPredicate {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        let (Some(field), Some(op), Some(value)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(AnalyticsError::InvalidFilter(format!(
                "expected field:op:value, got '{}'",
                s
            )));
        };

        let takes_list = viewstat_query::Operator::parse(op).is_some_and(|o| o.takes_list());
        let value = if takes_list {
            let items: Vec<Scalar> = value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(scalar)
                .collect();
            PredicateValue::List(items)
        } else {
            PredicateValue::Single(scalar(value))
        };

        Ok(Self::new(field.trim(), op.trim(), value))
    }
}

fn scalar(s: &str) -> Scalar {
    match s.parse::<i64>() {
        Ok(i) => Scalar::Int(i),
        Err(_) => Scalar::Text(s.to_string()),
    }
}

/// What to do with operator strings outside the supported set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorPolicy {
    /// Drop the predicate and log a warning
    #[default]
    Lenient,
    /// Reject the request
    Strict,
}

impl FromStr for OperatorPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err(format!(
                "unknown operator policy: {} (expected lenient or strict)",
                s
            )),
        }
    }
}

/// Calendar granularity for period buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Calendar day (UTC)
    Day,
    /// ISO week starting Monday
    Week,
    /// Calendar month
    Month,
    /// Calendar year
    Year,
}

impl Granularity {
    /// Parse granularity from string
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" | "1d" => Ok(Self::Day),
            "week" | "weekly" | "1w" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            "year" | "yearly" | "1y" => Ok(Self::Year),
            _ => Err(AnalyticsError::InvalidGranularity(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Grouping dimension for views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Viewer's country, labelled by country name
    Country,
    /// Signed-in viewer, labelled by username
    User,
    /// Viewed blog, labelled by title
    Blog,
}

impl Dimension {
    /// Parse dimension from string
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "country" | "viewer_country" => Ok(Self::Country),
            "user" | "viewer_user" => Ok(Self::User),
            "blog" | "viewed_entity" => Ok(Self::Blog),
            _ => Err(AnalyticsError::InvalidDimension(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::User => "user",
            Self::Blog => "blog",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
