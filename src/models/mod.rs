use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display format used when rendering a capture timestamp for clients
pub const COUNTER_TIMESTAMP_FORMAT: &str = "%B %d, %Y; %H:%M";

/// A monitored (search phrase, region) pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Query {
    pub id: Uuid,
    pub search_phrase: String,
    pub region: String,
}

/// Query as submitted by a client, before it has an identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewQuery {
    pub search_phrase: String,
    pub region: String,
}

impl NewQuery {
    pub fn new(search_phrase: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            search_phrase: search_phrase.into(),
            region: region.into(),
        }
    }

    /// Assign a fresh identity
    pub fn into_query(self) -> Query {
        Query {
            id: Uuid::new_v4(),
            search_phrase: self.search_phrase,
            region: self.region,
        }
    }
}

/// One timestamped snapshot of the listing count for a query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountRecord {
    pub id: Uuid,
    pub query_id: Uuid,
    pub quantity: u64,
    pub captured_at: DateTime<Utc>,
}

impl CountRecord {
    /// Assemble a record for a freshly extracted count.
    ///
    /// No validation happens here: `quantity` is unsigned by construction.
    pub fn build(query_id: Uuid, quantity: u64, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            query_id,
            quantity,
            captured_at: now,
        }
    }
}

/// Client-facing rendering of a [`CountRecord`]; storage ids are omitted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountView {
    pub quantity: u64,
    pub counter_timestamp: String,
}

impl From<&CountRecord> for CountView {
    fn from(record: &CountRecord) -> Self {
        Self {
            quantity: record.quantity,
            counter_timestamp: record
                .captured_at
                .format(COUNTER_TIMESTAMP_FORMAT)
                .to_string(),
        }
    }
}

/// Display fields of one listing card. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingSummary {
    pub title: String,
    pub description: String,
    /// Raw display string, e.g. "120 000 ₽"
    pub price: String,
    pub place: String,
    /// Raw display string, e.g. "2 часа назад"
    pub posted_at: String,
}
