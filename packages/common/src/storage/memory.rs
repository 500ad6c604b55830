use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::traits::{ObjectStore, validate_key};

const BASE_URL: &str = "memory://objects";

/// In-memory object store for tests and local runs.
///
/// Records every delete attempt and can be told to fail deletions, so
/// callers' best-effort cleanup policies can be asserted on.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    delete_attempts: Mutex<Vec<String>>,
    fail_deletes: AtomicBool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `delete_by_url` fail.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::Relaxed);
    }

    /// Whether an object is currently stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(key)
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys for which deletion was attempted, in order.
    pub fn delete_attempts(&self) -> Vec<String> {
        self.delete_attempts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn key_for(url: &str) -> Result<String, StorageError> {
        let prefix = format!("{BASE_URL}/");
        url.strip_prefix(&prefix)
            .map(str::to_string)
            .ok_or_else(|| StorageError::ForeignUrl(url.to_string()))
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(&self, key: &str, local_path: &Path) -> Result<String, StorageError> {
        validate_key(key)?;
        let bytes = fs::read(local_path).await?;
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), bytes);
        Ok(format!("{BASE_URL}/{key}"))
    }

    async fn delete_by_url(&self, url: &str) -> Result<(), StorageError> {
        let key = Self::key_for(url)?;
        self.delete_attempts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(key.clone());

        if self.fail_deletes.load(Ordering::Relaxed) {
            return Err(StorageError::Backend("injected delete failure".into()));
        }

        let removed = self
            .objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&key);
        match removed {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(url.to_string())),
        }
    }
}
