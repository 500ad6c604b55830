use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use app::config::{AppConfig, FeedConfig, StorageConfig};
use app::gallery::Gallery;
use app::models::{LocalImage, NewAlbum, NewPhoto};
use app::session::{Session, SessionState};
use app::state::AppContext;
use common::auth::LocalIdentityProvider;
use common::storage::MemoryObjectStore;
use common::store::MemoryStore;

pub const PASSWORD: &str = "correct-horse-battery";

/// A fully wired app over the in-memory backend platform.
pub struct TestApp {
    pub ctx: AppContext,
    pub store: Arc<MemoryStore>,
    pub objects: Arc<MemoryObjectStore>,
    pub identity: Arc<LocalIdentityProvider>,
    tmp: tempfile::TempDir,
}

fn test_config() -> AppConfig {
    AppConfig {
        storage: StorageConfig {
            backend: "memory".into(),
            root: PathBuf::from("unused"),
            public_base_url: "memory://objects".into(),
            bucket: None,
            region: None,
            endpoint: None,
        },
        feed: FeedConfig { page_size: 50 },
    }
}

impl TestApp {
    pub fn spawn() -> Self {
        let store = Arc::new(MemoryStore::new());
        let objects = Arc::new(MemoryObjectStore::new());
        let identity = Arc::new(LocalIdentityProvider::new());
        let ctx = AppContext::build(
            store.clone(),
            objects.clone(),
            identity.clone(),
            Arc::new(test_config()),
        );
        Self {
            ctx,
            store,
            objects,
            identity,
            tmp: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    pub fn gallery(&self) -> &Gallery {
        &self.ctx.gallery
    }

    pub fn session(&self) -> &Session {
        &self.ctx.session
    }

    /// Register an account and wait for the session to carry the merged
    /// profile; returns the uid.
    pub async fn register_user(&self, email: &str, username: &str) -> String {
        self.session()
            .register(email, PASSWORD, username)
            .await
            .expect("registration failed");
        let state = self
            .wait_for(|state| {
                state
                    .user
                    .as_ref()
                    .is_some_and(|user| user.username.as_deref() == Some(username))
            })
            .await;
        state.user.expect("user just matched").uid
    }

    /// Wait until the session state satisfies `predicate`.
    pub async fn wait_for<F>(&self, mut predicate: F) -> SessionState
    where
        F: FnMut(&SessionState) -> bool,
    {
        let mut rx = self.session().subscribe();
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                {
                    let state = rx.borrow_and_update().clone();
                    if predicate(&state) {
                        return state;
                    }
                }
                rx.changed().await.expect("session channel closed");
            }
        })
        .await
        .expect("timed out waiting for session state")
    }

    /// Write a small file to stand in for a picked image.
    pub fn local_image(&self, name: &str) -> LocalImage {
        let path = self.tmp.path().join(name);
        std::fs::write(&path, format!("image bytes of {name}")).expect("failed to write image");
        let size = std::fs::metadata(&path).map(|m| m.len()).ok();
        LocalImage {
            path,
            file_name: Some(name.to_string()),
            size,
        }
    }

    pub async fn create_album(&self, user_id: &str, title: &str) -> String {
        self.gallery()
            .create_album(NewAlbum {
                title: title.into(),
                description: String::new(),
                user_id: user_id.into(),
                photo_count: 0,
            })
            .await
            .expect("failed to create album")
    }

    /// Upload an image and register its photo document; returns
    /// `(photo_doc_id, image_url)`.
    pub async fn add_photo(&self, album_id: &str, user_id: &str, name: &str) -> (String, String) {
        let image = self.local_image(name);
        let upload_key = uuid::Uuid::now_v7().to_string();
        let url = self
            .gallery()
            .upload_photo(&image.path, &upload_key)
            .await
            .expect("upload failed");
        let id = self
            .gallery()
            .add_photo(NewPhoto {
                album_id: album_id.into(),
                user_id: user_id.into(),
                image_url: url.clone(),
                thumbnail_url: url.clone(),
                metadata: app::entity::PhotoMetadata {
                    original_name: image.file_name,
                    size: image.size,
                },
            })
            .await
            .expect("add_photo failed");
        (id, url)
    }
}
