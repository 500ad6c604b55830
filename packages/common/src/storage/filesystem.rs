use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::traits::{ObjectStore, validate_key};

/// Filesystem-backed object store.
///
/// Objects live at `{root}/{key}`; returned URLs are
/// `{base_url}/{key}`. Writes go through a temp file and a rename so a
/// failed upload never leaves a partial object behind.
pub struct FilesystemObjectStore {
    root: PathBuf,
    base_url: String,
}

impl FilesystemObjectStore {
    /// Create a new filesystem object store rooted at `root`.
    pub async fn new(root: PathBuf, base_url: impl Into<String>) -> Result<Self, StorageError> {
        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self {
            root,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.root.join(".tmp").join(uuid::Uuid::new_v4().to_string())
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    /// Map a URL this store produced back to its key.
    fn key_for(&self, url: &str) -> Result<String, StorageError> {
        let prefix = format!("{}/", self.base_url);
        let key = url
            .strip_prefix(&prefix)
            .ok_or_else(|| StorageError::ForeignUrl(url.to_string()))?;
        validate_key(key)?;
        Ok(key.to_string())
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn upload(&self, key: &str, local_path: &Path) -> Result<String, StorageError> {
        validate_key(key)?;

        let temp_path = self.temp_path();
        if let Err(e) = fs::copy(local_path, &temp_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        let object_path = self.object_path(key);
        if let Some(parent) = object_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(self.url_for(key))
    }

    async fn delete_by_url(&self, url: &str) -> Result<(), StorageError> {
        let key = self.key_for(url)?;
        match fs::remove_file(self.object_path(&key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(url.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
