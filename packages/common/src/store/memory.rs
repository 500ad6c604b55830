use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::backoff::calculate_backoff;

use super::error::StoreError;
use super::traits::{Direction, DocRef, Document, DocumentStore, Fields, Mutation, Query};

/// Maximum transactional-update attempts before reporting contention.
///
/// Every failed commit means some other writer succeeded, so a writer can
/// only be starved while distinct concurrent writers keep winning; this
/// bound comfortably exceeds any realistic contender count on one photo.
const MAX_TXN_ATTEMPTS: u32 = 32;
/// Base/ceiling for the conflict-retry backoff, in milliseconds.
const TXN_BACKOFF_BASE_MS: u64 = 1;
const TXN_BACKOFF_MAX_MS: u64 = 20;

#[derive(Debug, Clone)]
struct StoredDoc {
    fields: Fields,
    /// Bumped on every write; transactional updates commit only if the
    /// version they read is still current.
    version: u64,
    /// Insertion sequence, used to break creation-time ties.
    seq: u64,
    create_time: DateTime<Utc>,
    update_time: DateTime<Utc>,
}

impl StoredDoc {
    fn to_document(&self, id: &str) -> Document {
        Document {
            id: id.to_string(),
            create_time: self.create_time,
            update_time: self.update_time,
            fields: self.fields.clone(),
        }
    }
}

type Collections = HashMap<String, BTreeMap<String, StoredDoc>>;

/// In-memory [`DocumentStore`] with optimistic-concurrency transactions.
///
/// Transactional updates snapshot the document and its version, run the
/// mutation on the copy, and commit only if no other writer got there
/// first, retrying with jittered backoff otherwise. That is the same
/// contract a managed document database's transaction primitive offers,
/// which is what makes this store a faithful stand-in for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
    seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    fn read_snapshot(&self, collection: &str, id: &str) -> Option<StoredDoc> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.get(collection)?.get(id).cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .read_snapshot(collection, id)
            .map(|doc| doc.to_document(id)))
    }

    async fn insert(&self, collection: &str, fields: Fields) -> Result<Document, StoreError> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let doc = StoredDoc {
            fields,
            version: 0,
            seq: self.next_seq(),
            create_time: now,
            update_time: now,
        };
        let document = doc.to_document(&id);
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.entry(collection.to_string()).or_default().insert(id, doc);
        Ok(document)
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        let now = Utc::now();
        let seq = self.next_seq();
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let docs = inner.entry(collection.to_string()).or_default();
        let doc = match docs.get(id) {
            Some(existing) => StoredDoc {
                fields,
                version: existing.version + 1,
                seq: existing.seq,
                create_time: existing.create_time,
                update_time: now,
            },
            None => StoredDoc {
                fields,
                version: 0,
                seq,
                create_time: now,
                update_time: now,
            },
        };
        let document = doc.to_document(id);
        docs.insert(id.to_string(), doc);
        Ok(document)
    }

    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Document>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let Some(docs) = inner.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matches: Vec<(&String, &StoredDoc)> = docs
            .iter()
            .filter(|(_, doc)| {
                query
                    .filters()
                    .iter()
                    .all(|(field, value)| doc.fields.get(field) == Some(value))
            })
            .collect();

        matches.sort_by(|(_, a), (_, b)| (a.create_time, a.seq).cmp(&(b.create_time, b.seq)));
        if query.direction() == Direction::Descending {
            matches.reverse();
        }
        if let Some(limit) = query.max_results() {
            matches.truncate(limit);
        }

        Ok(matches
            .into_iter()
            .map(|(id, doc)| doc.to_document(id))
            .collect())
    }

    async fn update_in_txn(
        &self,
        collection: &str,
        id: &str,
        mutate: Mutation<'_>,
    ) -> Result<Document, StoreError> {
        for attempt in 1..=MAX_TXN_ATTEMPTS {
            let snapshot = self
                .read_snapshot(collection, id)
                .ok_or_else(|| StoreError::not_found(collection, id))?;

            let mut fields = snapshot.fields.clone();
            mutate(&mut fields);

            let committed = {
                let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
                let docs = inner
                    .get_mut(collection)
                    .ok_or_else(|| StoreError::not_found(collection, id))?;
                let current = docs
                    .get_mut(id)
                    .ok_or_else(|| StoreError::not_found(collection, id))?;
                if current.version == snapshot.version {
                    current.version += 1;
                    current.fields = fields;
                    current.update_time = Utc::now();
                    Some(current.to_document(id))
                } else {
                    None
                }
            };

            match committed {
                Some(document) => return Ok(document),
                None => {
                    tracing::debug!(collection, id, attempt, "transaction write conflict, retrying");
                    tokio::time::sleep(calculate_backoff(
                        attempt,
                        TXN_BACKOFF_BASE_MS,
                        TXN_BACKOFF_MAX_MS,
                    ))
                    .await;
                }
            }
        }

        Err(StoreError::TransactionContention {
            collection: collection.to_string(),
            id: id.to_string(),
            attempts: MAX_TXN_ATTEMPTS,
        })
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        Ok(inner
            .get_mut(collection)
            .is_some_and(|docs| docs.remove(id).is_some()))
    }

    async fn delete_batch(&self, refs: &[DocRef]) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        for doc_ref in refs {
            if let Some(docs) = inner.get_mut(&doc_ref.collection) {
                docs.remove(&doc_ref.id);
            }
        }
        Ok(())
    }
}
