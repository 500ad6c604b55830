use std::path::Path;

use async_trait::async_trait;
use s3::Bucket;
use tokio::fs;

use super::error::StorageError;
use super::traits::{ObjectStore, validate_key};

/// S3-backed object store.
///
/// Returned URLs are `{public_base_url}/{key}`; the bucket (or a CDN in
/// front of it) is expected to serve keys publicly under that base.
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
    public_base_url: String,
}

impl S3ObjectStore {
    pub fn new(bucket: Box<Bucket>, public_base_url: impl Into<String>) -> Self {
        Self {
            bucket,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn key_for(&self, url: &str) -> Result<String, StorageError> {
        let prefix = format!("{}/", self.public_base_url);
        let key = url
            .strip_prefix(&prefix)
            .ok_or_else(|| StorageError::ForeignUrl(url.to_string()))?;
        validate_key(key)?;
        Ok(key.to_string())
    }
}

fn backend(err: s3::error::S3Error) -> StorageError {
    StorageError::Backend(err.to_string())
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(&self, key: &str, local_path: &Path) -> Result<String, StorageError> {
        validate_key(key)?;
        let bytes = fs::read(local_path).await?;
        self.bucket.put_object(key, &bytes).await.map_err(backend)?;
        Ok(format!("{}/{}", self.public_base_url, key))
    }

    async fn delete_by_url(&self, url: &str) -> Result<(), StorageError> {
        let key = self.key_for(url)?;
        self.bucket.delete_object(&key).await.map_err(backend)?;
        Ok(())
    }
}
