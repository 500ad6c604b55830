use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Object-store backend: `filesystem`, `memory`, or `s3` (with the
    /// `s3` feature).
    pub backend: String,
    /// Root directory for the filesystem backend.
    pub root: PathBuf,
    /// Public URL prefix under which stored objects resolve.
    pub public_base_url: String,
    /// Bucket name for the `s3` backend.
    pub bucket: Option<String>,
    /// Region for the `s3` backend, e.g. `eu-central-1`.
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible services.
    pub endpoint: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    /// Default number of photos per feed fetch.
    pub page_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub feed: FeedConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("storage.backend", "filesystem")?
            .set_default("storage.root", "./data/objects")?
            .set_default("storage.public_base_url", "http://localhost/objects")?
            .set_default("feed.page_size", 50)?
            // Load from config/glimpse.toml
            .add_source(File::with_name("config/glimpse").required(false))
            // Override from environment (e.g., GLIMPSE__STORAGE__BUCKET)
            .add_source(Environment::with_prefix("GLIMPSE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
