use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use common::auth::{AuthUser, IdentityProvider};
use common::store::{DocumentStore, fields};

use crate::entity::User;
use crate::entity::collections::USERS;
use crate::error::AppError;

/// The signed-in user as the screens see it: the provider's auth record
/// merged with the extended profile document (profile fields win).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionUser {
    pub uid: String,
    pub email: String,
    pub username: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Process-wide session state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<SessionUser>,
    /// True until the first auth-state notification has been processed.
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

/// Identity state for the whole process.
///
/// Fed by the identity provider's change stream and enriched from the
/// `users` collection. Created with [`Session::start`] (which subscribes
/// and spawns the merge task) and torn down with [`Session::shutdown`];
/// a merge resolving after shutdown is simply discarded.
pub struct Session {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
    state: watch::Sender<SessionState>,
    merge_task: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    /// Subscribe to the identity provider and start merging auth states.
    pub fn start(identity: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        let task = tokio::spawn(merge_loop(
            identity.subscribe(),
            store.clone(),
            state.clone(),
        ));
        Self {
            identity,
            store,
            state,
            merge_task: Mutex::new(Some(task)),
        }
    }

    /// Sign in with email and password. Provider errors pass through
    /// unchanged.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AppError> {
        self.identity.sign_in(email, password).await?;
        Ok(())
    }

    /// Create an account, write its profile document, and set the display
    /// name.
    ///
    /// The display-name update re-notifies the auth stream, so the merge
    /// task observes the profile even when the first notification raced
    /// the profile write.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<(), AppError> {
        let username = username.trim();
        if username.is_empty() || username.chars().count() > 32 {
            return Err(AppError::Validation("Username must be 1-32 characters".into()));
        }

        let user = self.identity.sign_up(email, password).await?;

        self.store
            .set(
                USERS,
                &user.uid,
                fields(json!({
                    "username": username,
                    "email": user.email,
                })),
            )
            .await
            .map_err(AppError::Write)?;

        self.identity.update_display_name(username).await?;
        Ok(())
    }

    /// Sign out. Provider errors pass through unchanged.
    pub async fn logout(&self) -> Result<(), AppError> {
        self.identity.sign_out().await?;
        Ok(())
    }

    /// Subscribe to session-state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Stop the merge task.
    pub fn shutdown(&self) {
        if let Ok(mut guard) = self.merge_task.lock() {
            if let Some(task) = guard.take() {
                task.abort();
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn merge_loop(
    mut auth_rx: watch::Receiver<Option<AuthUser>>,
    store: Arc<dyn DocumentStore>,
    state: watch::Sender<SessionState>,
) {
    loop {
        let auth_user = auth_rx.borrow_and_update().clone();
        let user = match auth_user {
            Some(auth) => Some(merge_profile(store.as_ref(), auth).await),
            None => None,
        };
        state.send_replace(SessionState {
            user,
            loading: false,
        });

        if auth_rx.changed().await.is_err() {
            break;
        }
    }
}

/// Merge the auth record with the `users/{uid}` document, preferring
/// profile fields; fall back to the bare auth record when the lookup
/// fails or the document is missing.
async fn merge_profile(store: &dyn DocumentStore, auth: AuthUser) -> SessionUser {
    match store.get(USERS, &auth.uid).await {
        Ok(Some(doc)) => match User::from_doc(doc) {
            Ok(profile) => {
                return SessionUser {
                    uid: auth.uid,
                    email: if profile.email.is_empty() {
                        auth.email
                    } else {
                        profile.email
                    },
                    username: Some(profile.username),
                    created_at: Some(profile.created_at),
                };
            }
            Err(e) => {
                warn!(uid = %auth.uid, error = %e, "malformed user profile; using auth record");
            }
        },
        Ok(None) => {}
        Err(e) => {
            warn!(uid = %auth.uid, error = %e, "failed to load user profile; using auth record");
        }
    }

    SessionUser {
        uid: auth.uid,
        email: auth.email,
        username: auth.display_name,
        created_at: None,
    }
}
