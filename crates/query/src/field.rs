//! Field paths and typed field values
//!
//! Predicates address event data by dotted path (`blog.author.id`). Django-style
//! `__` separators (`blog__author__id`) are accepted and normalized.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A known field path on [`ViewEvent`](crate::ViewEvent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Field {
    Id,
    ViewedAt,
    BlogId,
    BlogTitle,
    BlogAuthorId,
    BlogAuthorUsername,
    BlogCountryCode,
    BlogCountryName,
    UserId,
    UserUsername,
    ViewerCountryCode,
    ViewerCountryName,
}

/// Storage type of a field, used to coerce predicate values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
    Timestamp,
}

/// All fields, in documentation order
pub const ALL_FIELDS: &[Field] = &[
    Field::Id,
    Field::ViewedAt,
    Field::BlogId,
    Field::BlogTitle,
    Field::BlogAuthorId,
    Field::BlogAuthorUsername,
    Field::BlogCountryCode,
    Field::BlogCountryName,
    Field::UserId,
    Field::UserUsername,
    Field::ViewerCountryCode,
    Field::ViewerCountryName,
];

impl Field {
    /// Parse a field path
    ///
    /// A bare relation name resolves to its key: `blog` and `user` to their
    /// ids, `viewer_country` and `blog.country` to the country code.
    pub fn parse(path: &str) -> Result<Self, StoreError> {
        let normalized = path.trim().replace("__", ".");
        let field = match normalized.as_str() {
            "id" => Self::Id,
            "viewed_at" => Self::ViewedAt,
            "blog" | "blog.id" | "blog_id" => Self::BlogId,
            "blog.title" => Self::BlogTitle,
            "blog.author" | "blog.author.id" | "blog.author_id" => Self::BlogAuthorId,
            "blog.author.username" => Self::BlogAuthorUsername,
            "blog.country" | "blog.country.code" => Self::BlogCountryCode,
            "blog.country.name" => Self::BlogCountryName,
            "user" | "user.id" | "user_id" => Self::UserId,
            "user.username" => Self::UserUsername,
            "viewer_country" | "viewer_country.code" => Self::ViewerCountryCode,
            "viewer_country.name" => Self::ViewerCountryName,
            _ => return Err(StoreError::UnknownField(path.to_string())),
        };
        Ok(field)
    }

    /// Canonical dotted path
    pub fn path(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::ViewedAt => "viewed_at",
            Self::BlogId => "blog.id",
            Self::BlogTitle => "blog.title",
            Self::BlogAuthorId => "blog.author.id",
            Self::BlogAuthorUsername => "blog.author.username",
            Self::BlogCountryCode => "blog.country.code",
            Self::BlogCountryName => "blog.country.name",
            Self::UserId => "user.id",
            Self::UserUsername => "user.username",
            Self::ViewerCountryCode => "viewer_country.code",
            Self::ViewerCountryName => "viewer_country.name",
        }
    }

    /// Flat column name in a denormalized view table
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::ViewedAt => "viewed_at",
            Self::BlogId => "blog_id",
            Self::BlogTitle => "blog_title",
            Self::BlogAuthorId => "blog_author_id",
            Self::BlogAuthorUsername => "blog_author_username",
            Self::BlogCountryCode => "blog_country_code",
            Self::BlogCountryName => "blog_country_name",
            Self::UserId => "user_id",
            Self::UserUsername => "user_username",
            Self::ViewerCountryCode => "viewer_country_code",
            Self::ViewerCountryName => "viewer_country_name",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Id | Self::BlogId | Self::BlogAuthorId | Self::UserId => FieldKind::Integer,
            Self::ViewedAt => FieldKind::Timestamp,
            _ => FieldKind::Text,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl TryFrom<String> for Field {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Field> for String {
    fn from(field: Field) -> Self {
        field.path().to_string()
    }
}

/// A typed value read from an event or coerced from a predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Int(i64),
    Text(Cow<'a, str>),
    Time(DateTime<Utc>),
}

impl<'a> FieldValue<'a> {
    pub fn text(s: &'a str) -> Self {
        Self::Text(Cow::Borrowed(s))
    }

    /// Compare two values of the same kind
    ///
    /// Values of different kinds are incomparable.
    pub fn compare(&self, other: &FieldValue<'_>) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), FieldValue::Int(b)) => Some(a.cmp(b)),
            (Self::Text(a), FieldValue::Text(b)) => Some(a.as_ref().cmp(b.as_ref())),
            (Self::Time(a), FieldValue::Time(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Parse a timestamp from RFC 3339, `YYYY-MM-DD HH:MM:SS`, or `YYYY-MM-DD`
///
/// Naive forms are read as UTC; a bare date is midnight UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}
