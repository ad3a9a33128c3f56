use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{CountRecord, Query};

/// On-disk layout of the snapshot file
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    #[serde(default)]
    pub queries: Vec<QueryDocument>,
    #[serde(default)]
    pub counters: Vec<CounterDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct QueryDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub search_phrase: String,
    pub region: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CounterDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub query_id: Uuid,
    pub quantity: u64,
    pub timestamp: DateTime<Utc>,
}

impl From<&Query> for QueryDocument {
    fn from(query: &Query) -> Self {
        Self {
            id: query.id,
            search_phrase: query.search_phrase.clone(),
            region: query.region.clone(),
        }
    }
}

impl From<QueryDocument> for Query {
    fn from(doc: QueryDocument) -> Self {
        Self {
            id: doc.id,
            search_phrase: doc.search_phrase,
            region: doc.region,
        }
    }
}

impl From<&CountRecord> for CounterDocument {
    fn from(record: &CountRecord) -> Self {
        Self {
            id: record.id,
            query_id: record.query_id,
            quantity: record.quantity,
            timestamp: record.captured_at,
        }
    }
}

impl From<CounterDocument> for CountRecord {
    fn from(doc: CounterDocument) -> Self {
        Self {
            id: doc.id,
            query_id: doc.query_id,
            quantity: doc.quantity,
            captured_at: doc.timestamp,
        }
    }
}
