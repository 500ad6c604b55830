use std::sync::Arc;

use anyhow::Result;
use tracing::{Level, info};

use common::auth::LocalIdentityProvider;
use common::storage::{FilesystemObjectStore, MemoryObjectStore, ObjectStore};
use common::store::MemoryStore;

use app::config::AppConfig;
use app::shell;
use app::state::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;
    let objects = build_object_store(&config).await?;
    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(LocalIdentityProvider::new());

    let ctx = AppContext::build(store, objects, identity, Arc::new(config));

    info!("glimpse starting");
    shell::run(ctx.clone()).await?;

    ctx.session.shutdown();
    Ok(())
}

async fn build_object_store(config: &AppConfig) -> Result<Arc<dyn ObjectStore>> {
    match config.storage.backend.as_str() {
        "filesystem" => {
            let store = FilesystemObjectStore::new(
                config.storage.root.clone(),
                config.storage.public_base_url.clone(),
            )
            .await?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(MemoryObjectStore::new())),
        #[cfg(feature = "s3")]
        "s3" => {
            use s3::creds::Credentials;
            use s3::{Bucket, Region};

            let name = config
                .storage
                .bucket
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("storage.bucket is required for the s3 backend"))?;
            let region_name = config
                .storage
                .region
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("storage.region is required for the s3 backend"))?;
            let region = match config.storage.endpoint.clone() {
                Some(endpoint) => Region::Custom {
                    region: region_name.to_string(),
                    endpoint,
                },
                None => region_name.parse()?,
            };
            let bucket = Bucket::new(name, region, Credentials::default()?)?;
            Ok(Arc::new(common::storage::S3ObjectStore::new(
                bucket,
                config.storage.public_base_url.clone(),
            )))
        }
        other => anyhow::bail!("unknown storage backend: {other}"),
    }
}
