//! View event model
//!
//! A [`ViewEvent`] records one view of one blog. Events are immutable facts:
//! stores hand out snapshots and nothing in this workspace mutates them.

use serde::{Deserialize, Serialize};

use chrono::{DateTime, Utc};

use crate::field::{Field, FieldValue};

/// A single blog view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewEvent {
    /// Event identifier (unique within a store)
    pub id: u64,
    /// When the view happened
    pub viewed_at: DateTime<Utc>,
    /// The viewed blog
    pub blog: Blog,
    /// Signed-in viewer, if any
    #[serde(default)]
    pub user: Option<UserRef>,
    /// Where the viewer was, if known
    #[serde(default)]
    pub viewer_country: Option<Country>,
}

/// The viewed entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub id: u64,
    pub title: String,
    pub author: UserRef,
    /// Country the blog is published under
    #[serde(default)]
    pub country: Option<Country>,
}

/// A user account (blog author or viewer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: u64,
    pub username: String,
}

/// A country, keyed by ISO 3166 alpha-2 code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

impl ViewEvent {
    /// Resolve a field path against this event
    ///
    /// Returns `None` when the field, or any relation on the way to it, is null.
    pub fn field(&self, field: Field) -> Option<FieldValue<'_>> {
        let value = match field {
            Field::Id => FieldValue::Int(self.id as i64),
            Field::ViewedAt => FieldValue::Time(self.viewed_at),
            Field::BlogId => FieldValue::Int(self.blog.id as i64),
            Field::BlogTitle => FieldValue::text(&self.blog.title),
            Field::BlogAuthorId => FieldValue::Int(self.blog.author.id as i64),
            Field::BlogAuthorUsername => FieldValue::text(&self.blog.author.username),
            Field::BlogCountryCode => FieldValue::text(&self.blog.country.as_ref()?.code),
            Field::BlogCountryName => FieldValue::text(&self.blog.country.as_ref()?.name),
            Field::UserId => FieldValue::Int(self.user.as_ref()?.id as i64),
            Field::UserUsername => FieldValue::text(&self.user.as_ref()?.username),
            Field::ViewerCountryCode => FieldValue::text(&self.viewer_country.as_ref()?.code),
            Field::ViewerCountryName => FieldValue::text(&self.viewer_country.as_ref()?.name),
        };
        Some(value)
    }
}
