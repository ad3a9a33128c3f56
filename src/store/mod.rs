//! Persistence gateway for queries and count records.
//!
//! Typed records go in and come out; the document shapes used for storage
//! never leave this module.

mod documents;
mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{CountRecord, NewQuery, Query};

pub use memory::MemoryStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("snapshot file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Filter for [`Store::find_counts`]; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountFilter {
    pub query_id: Option<Uuid>,
    /// Inclusive lower bound on `captured_at`
    pub captured_after: Option<DateTime<Utc>>,
}

impl CountFilter {
    pub fn for_query(query_id: Uuid) -> Self {
        Self {
            query_id: Some(query_id),
            captured_after: None,
        }
    }

    pub fn captured_after(mut self, since: DateTime<Utc>) -> Self {
        self.captured_after = Some(since);
        self
    }

    pub fn matches(&self, record: &CountRecord) -> bool {
        self.query_id.map_or(true, |id| record.query_id == id)
            && self
                .captured_after
                .map_or(true, |since| record.captured_at >= since)
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Store a query unless one with the same `search_phrase` exists.
    ///
    /// The phrase alone is the dedup key: a second submission with a
    /// different region returns the first query unchanged. Implementations
    /// are not required to make the check-then-insert atomic.
    async fn insert_query(&self, query: NewQuery) -> Result<Query, StoreError>;

    async fn find_query_by_id(&self, id: Uuid) -> Result<Option<Query>, StoreError>;

    async fn list_queries(&self) -> Result<Vec<Query>, StoreError>;

    async fn insert_count(&self, record: CountRecord) -> Result<CountRecord, StoreError>;

    /// Matching records in insertion order
    async fn find_counts(&self, filter: &CountFilter) -> Result<Vec<CountRecord>, StoreError>;
}
