use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::documents::{CounterDocument, QueryDocument, Snapshot};
use super::{CountFilter, Store, StoreError};
use crate::models::{CountRecord, NewQuery, Query};

#[derive(Debug, Default)]
struct Collections {
    queries: Vec<Query>,
    counts: Vec<CountRecord>,
}

impl Collections {
    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            queries: self.queries.iter().map(QueryDocument::from).collect(),
            counters: self.counts.iter().map(CounterDocument::from).collect(),
        }
    }

    fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            queries: snapshot.queries.into_iter().map(Query::from).collect(),
            counts: snapshot.counters.into_iter().map(CountRecord::from).collect(),
        }
    }
}

/// Document store kept in memory, optionally mirrored to a JSON file.
///
/// With a snapshot path every insert rewrites the file while holding the
/// write lock. An insert whose snapshot write fails is rolled back, so
/// memory never holds anything the file does not.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    /// Volatile store, lost on restart
    pub fn new() -> Self {
        Self::default()
    }

    /// Store backed by `path`, loading it when it already exists
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let collections = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
                let collections = Collections::from_snapshot(snapshot);
                info!(
                    "📂 Loaded {} queries and {} counters from {}",
                    collections.queries.len(),
                    collections.counts.len(),
                    path.display()
                );
                collections
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No snapshot at {}, starting empty", path.display());
                Collections::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            inner: RwLock::new(collections),
            snapshot_path: Some(path),
        })
    }

    async fn persist(&self, collections: &Collections) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&collections.to_snapshot())?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;

        debug!("💾 Saved snapshot to {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_query(&self, query: NewQuery) -> Result<Query, StoreError> {
        let mut collections = self.inner.write().await;

        if let Some(existing) = collections
            .queries
            .iter()
            .find(|q| q.search_phrase == query.search_phrase)
        {
            debug!(query_id = %existing.id, "Query already stored, reusing it");
            return Ok(existing.clone());
        }

        let query = query.into_query();
        collections.queries.push(query.clone());
        if let Err(e) = self.persist(&collections).await {
            collections.queries.pop();
            return Err(e);
        }

        info!(query_id = %query.id, "Stored new query");
        Ok(query)
    }

    async fn find_query_by_id(&self, id: Uuid) -> Result<Option<Query>, StoreError> {
        let collections = self.inner.read().await;
        Ok(collections.queries.iter().find(|q| q.id == id).cloned())
    }

    async fn list_queries(&self) -> Result<Vec<Query>, StoreError> {
        Ok(self.inner.read().await.queries.clone())
    }

    async fn insert_count(&self, record: CountRecord) -> Result<CountRecord, StoreError> {
        let mut collections = self.inner.write().await;
        collections.counts.push(record.clone());
        if let Err(e) = self.persist(&collections).await {
            collections.counts.pop();
            return Err(e);
        }
        Ok(record)
    }

    async fn find_counts(&self, filter: &CountFilter) -> Result<Vec<CountRecord>, StoreError> {
        let collections = self.inner.read().await;
        Ok(collections
            .counts
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }
}
