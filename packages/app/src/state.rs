use std::sync::Arc;

use common::auth::IdentityProvider;
use common::storage::ObjectStore;
use common::store::DocumentStore;

use crate::config::AppConfig;
use crate::gallery::Gallery;
use crate::session::Session;

/// Shared handles injected into screens.
#[derive(Clone)]
pub struct AppContext {
    pub gallery: Arc<Gallery>,
    pub session: Arc<Session>,
    pub config: Arc<AppConfig>,
}

impl AppContext {
    /// Wire the access layer and session over a backend platform.
    pub fn build(
        store: Arc<dyn DocumentStore>,
        objects: Arc<dyn ObjectStore>,
        identity: Arc<dyn IdentityProvider>,
        config: Arc<AppConfig>,
    ) -> Self {
        let gallery = Arc::new(Gallery::new(store.clone(), objects, config.feed.page_size));
        let session = Arc::new(Session::start(identity, store));
        Self {
            gallery,
            session,
            config,
        }
    }
}
