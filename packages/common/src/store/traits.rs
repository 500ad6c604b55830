use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use super::error::StoreError;

/// Named fields of a stored document.
pub type Fields = serde_json::Map<String, Value>;

/// Convert a JSON value into document fields.
///
/// Anything other than an object becomes an empty field map; callers build
/// documents with `serde_json::json!({ ... })`, which always yields one.
pub fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

/// A document read back from the store, with server-assigned metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    /// Server-assigned creation timestamp.
    pub create_time: DateTime<Utc>,
    /// Server-assigned timestamp of the last write.
    pub update_time: DateTime<Utc>,
    pub fields: Fields,
}

/// Reference to one document, for batched operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocRef {
    pub collection: String,
    pub id: String,
}

impl DocRef {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

/// Sort direction for creation-time ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// A filtered, ordered, limited read over one collection.
#[derive(Debug, Clone, Default)]
pub struct Query {
    filters: Vec<(String, Value)>,
    direction: Direction,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only documents whose `field` equals `value`.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Order results by creation time.
    pub fn order_created(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Return at most `limit` documents.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filters(&self) -> &[(String, Value)] {
        &self.filters
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn max_results(&self) -> Option<usize> {
        self.limit
    }
}

/// Mutation applied to a document's fields inside a transaction.
///
/// May run more than once: implementations re-invoke it when the write
/// conflicts with a concurrent update.
pub type Mutation<'a> = &'a (dyn Fn(&mut Fields) + Sync);

/// Schemaless document database: named collections mapping generated
/// identifiers to field maps.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document, or `None` if absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Insert a new document under a store-generated id.
    async fn insert(&self, collection: &str, fields: Fields) -> Result<Document, StoreError>;

    /// Create or replace the document with a caller-chosen id.
    ///
    /// Replacing keeps the original creation timestamp.
    async fn set(&self, collection: &str, id: &str, fields: Fields)
    -> Result<Document, StoreError>;

    /// Run a filtered, ordered, limited read over one collection.
    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Document>, StoreError>;

    /// Atomically read, mutate, and write back one document.
    ///
    /// Returns the document as written. Fails with [`StoreError::NotFound`]
    /// if the document does not exist, and with
    /// [`StoreError::TransactionContention`] once conflict retries are
    /// exhausted.
    async fn update_in_txn(
        &self,
        collection: &str,
        id: &str,
        mutate: Mutation<'_>,
    ) -> Result<Document, StoreError>;

    /// Delete one document. Returns `true` if it existed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// Delete every referenced document in one atomic batch.
    ///
    /// References to documents that no longer exist are ignored.
    async fn delete_batch(&self, refs: &[DocRef]) -> Result<(), StoreError>;
}
