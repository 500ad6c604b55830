use std::path::Path;

use async_trait::async_trait;

use super::error::StorageError;

/// Key→blob object storage addressed back by public URL.
///
/// Keys are `/`-separated, e.g. `photos/{photoId}`. `upload` returns the
/// URL under which the object resolves; `delete_by_url` accepts exactly
/// those URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload the file at `local_path` under `key`; returns the public URL.
    async fn upload(&self, key: &str, local_path: &Path) -> Result<String, StorageError>;

    /// Delete the object a previously returned URL points at.
    async fn delete_by_url(&self, url: &str) -> Result<(), StorageError>;
}

/// Validate an object key: non-empty `/`-separated segments, no hidden
/// segments, no traversal, no control characters.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let invalid = || StorageError::InvalidKey(key.to_string());

    if key.is_empty() {
        return Err(invalid());
    }
    for segment in key.split('/') {
        if segment.is_empty() || segment.starts_with('.') {
            return Err(invalid());
        }
        if segment.contains('\\') || segment.chars().any(|c| c.is_ascii_control()) {
            return Err(invalid());
        }
    }
    Ok(())
}
