//! In-memory event store
//!
//! Holds an immutable snapshot of events and evaluates queries in process.
//! Used for JSON Lines fixtures and tests.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::backend::EventStore;
use crate::error::StoreError;
use crate::event::ViewEvent;
use crate::filter::EventQuery;

/// Event store backed by a shared, sorted slice
///
/// Cloning is cheap; clones share the same snapshot.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    events: Arc<[ViewEvent]>,
}

impl MemoryStore {
    /// Create a store from events in any order
    pub fn new(mut events: Vec<ViewEvent>) -> Self {
        events.sort_by(|a, b| a.viewed_at.cmp(&b.viewed_at).then(a.id.cmp(&b.id)));
        Self {
            events: events.into(),
        }
    }

    /// Parse JSON Lines, one event per line
    ///
    /// Blank lines are skipped. The first undecodable line fails the whole
    /// load with its 1-based line number.
    pub fn parse_jsonl(input: &str) -> Result<Self, StoreError> {
        let mut events = Vec::new();
        for (idx, line) in input.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let event = serde_json::from_str(line).map_err(|e| StoreError::InvalidData {
                line: idx + 1,
                message: e.to_string(),
            })?;
            events.push(event);
        }
        Ok(Self::new(events))
    }

    /// Load a JSON Lines file
    pub async fn load_jsonl(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        let store = Self::parse_jsonl(&content)?;
        tracing::info!(path = %path.display(), events = store.len(), "loaded events");
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn query(&self, query: &EventQuery) -> Result<Vec<ViewEvent>, StoreError> {
        // Sorted by viewed_at, so the lower bound is a binary search
        let start = match query.lower_bound() {
            Some(bound) => self.events.partition_point(|e| e.viewed_at < bound),
            None => 0,
        };

        let matched: Vec<ViewEvent> = self.events[start..]
            .iter()
            .filter(|e| query.matches(e))
            .cloned()
            .collect();

        tracing::debug!(
            scanned = self.events.len() - start,
            matched = matched.len(),
            predicates = query.predicates().len(),
            "memory query executed"
        );

        Ok(matched)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
