//! Predicates and resolved event queries
//!
//! A [`Predicate`] is `field <operator> value`. An [`EventQuery`] is the AND of
//! its predicates plus an optional lower bound on `viewed_at`. Stores either
//! evaluate queries directly ([`EventQuery::matches`]) or compile them to their
//! own query language.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::event::ViewEvent;
use crate::field::{Field, FieldKind, FieldValue, parse_timestamp};

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Equal
    Eq,
    /// Not equal
    Neq,
    /// In list
    In,
    /// Not in list
    Nin,
    /// Greater than
    Gt,
    /// Less than
    Lt,
}

impl Operator {
    /// Parse an operator keyword
    ///
    /// Returns `None` for unknown operators; callers decide whether that is
    /// an error.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "eq" | "=" | "==" => Some(Self::Eq),
            "neq" | "ne" | "!=" | "<>" => Some(Self::Neq),
            "in" => Some(Self::In),
            "nin" | "not_in" => Some(Self::Nin),
            "gt" | ">" => Some(Self::Gt),
            "lt" | "<" => Some(Self::Lt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::In => "in",
            Self::Nin => "nin",
            Self::Gt => "gt",
            Self::Lt => "lt",
        }
    }

    /// Whether the operator tests set membership
    pub fn takes_list(&self) -> bool {
        matches!(self, Self::In | Self::Nin)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar predicate value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Text(String),
}

impl Scalar {
    /// Coerce to the storage type of a field
    ///
    /// Returns `None` when the value cannot represent that type.
    pub fn coerce(&self, kind: FieldKind) -> Option<FieldValue<'_>> {
        match (self, kind) {
            (Self::Int(i), FieldKind::Integer) => Some(FieldValue::Int(*i)),
            (Self::Int(i), FieldKind::Text) => Some(FieldValue::Text(Cow::Owned(i.to_string()))),
            (Self::Int(i), FieldKind::Timestamp) => {
                DateTime::from_timestamp(*i, 0).map(FieldValue::Time)
            }
            (Self::Text(s), FieldKind::Integer) => s.trim().parse().ok().map(FieldValue::Int),
            (Self::Text(s), FieldKind::Text) => Some(FieldValue::text(s)),
            (Self::Text(s), FieldKind::Timestamp) => parse_timestamp(s).map(FieldValue::Time),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Predicate value (single scalar or list)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredicateValue {
    Single(Scalar),
    List(Vec<Scalar>),
}

impl PredicateValue {
    /// View as a list; a single scalar is a one-element list
    pub fn as_list(&self) -> &[Scalar] {
        match self {
            Self::Single(s) => std::slice::from_ref(s),
            Self::List(values) => values,
        }
    }
}

impl From<Scalar> for PredicateValue {
    fn from(v: Scalar) -> Self {
        Self::Single(v)
    }
}

impl From<i64> for PredicateValue {
    fn from(v: i64) -> Self {
        Self::Single(Scalar::Int(v))
    }
}

impl From<&str> for PredicateValue {
    fn from(v: &str) -> Self {
        Self::Single(Scalar::from(v))
    }
}

impl From<String> for PredicateValue {
    fn from(v: String) -> Self {
        Self::Single(Scalar::Text(v))
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for PredicateValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// A single `field <operator> value` test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPredicateParts")]
pub struct Predicate {
    field: Field,
    operator: Operator,
    value: PredicateValue,
}

#[derive(Deserialize)]
struct RawPredicateParts {
    field: Field,
    operator: Operator,
    value: PredicateValue,
}

impl TryFrom<RawPredicateParts> for Predicate {
    type Error = StoreError;

    fn try_from(raw: RawPredicateParts) -> Result<Self, Self::Error> {
        Self::new(raw.field, raw.operator, raw.value)
    }
}

impl Predicate {
    /// Create a predicate, checking the value shape against the operator
    ///
    /// `in`/`nin` accept a scalar (one-element list) or a list; every other
    /// operator needs exactly one scalar.
    pub fn new(
        field: Field,
        operator: Operator,
        value: impl Into<PredicateValue>,
    ) -> Result<Self, StoreError> {
        let value = value.into();
        let value = match (operator.takes_list(), value) {
            (true, PredicateValue::Single(s)) => PredicateValue::List(vec![s]),
            (true, list) => list,
            (false, PredicateValue::List(_)) => {
                return Err(StoreError::InvalidPredicate(format!(
                    "{} on {} needs a single value, got a list",
                    operator, field
                )));
            }
            (false, single) => single,
        };
        Ok(Self {
            field,
            operator,
            value,
        })
    }

    /// Equality predicate
    pub fn eq(field: Field, value: impl Into<Scalar>) -> Self {
        Self {
            field,
            operator: Operator::Eq,
            value: PredicateValue::Single(value.into()),
        }
    }

    /// Set membership predicate
    pub fn is_in<T: Into<Scalar>>(field: Field, values: Vec<T>) -> Self {
        Self {
            field,
            operator: Operator::In,
            value: values.into(),
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &PredicateValue {
        &self.value
    }

    /// Evaluate against one event
    ///
    /// A null field, or a value that cannot be coerced to the field's type,
    /// fails `eq`/`in`/`gt`/`lt` and satisfies `neq`/`nin`.
    pub fn matches(&self, event: &ViewEvent) -> bool {
        let actual = event.field(self.field);
        let kind = self.field.kind();
        let cmp = |scalar: &Scalar| -> Option<Ordering> {
            let actual = actual.as_ref()?;
            let expected = scalar.coerce(kind)?;
            actual.compare(&expected)
        };

        let any = |want: Ordering| self.value.as_list().iter().any(|s| cmp(s) == Some(want));

        match self.operator {
            Operator::Eq | Operator::In => any(Ordering::Equal),
            Operator::Neq | Operator::Nin => !any(Ordering::Equal),
            Operator::Gt => any(Ordering::Greater),
            Operator::Lt => any(Ordering::Less),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            PredicateValue::Single(s) => write!(f, "{} {} {}", self.field, self.operator, s),
            PredicateValue::List(values) => {
                let joined: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{} {} [{}]", self.field, self.operator, joined.join(", "))
            }
        }
    }
}

/// A resolved query against an event store
///
/// Immutable: every refinement returns a new query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    predicates: Vec<Predicate>,
    since: Option<DateTime<Utc>>,
}

impl EventQuery {
    /// Query matching every event
    pub fn all() -> Self {
        Self::default()
    }

    /// New query with one more predicate ANDed in
    pub fn and(&self, predicate: Predicate) -> Self {
        let mut next = self.clone();
        next.predicates.push(predicate);
        next
    }

    /// New query restricted to `viewed_at >= bound`
    ///
    /// Bounds intersect: the later of the existing and new bound wins.
    pub fn since(&self, bound: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.since = Some(match self.since {
            Some(existing) => existing.max(bound),
            None => bound,
        });
        next
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn lower_bound(&self) -> Option<DateTime<Utc>> {
        self.since
    }

    /// Evaluate against one event
    pub fn matches(&self, event: &ViewEvent) -> bool {
        if let Some(bound) = self.since
            && event.viewed_at < bound
        {
            return false;
        }
        self.predicates.iter().all(|p| p.matches(event))
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod filter_test;
