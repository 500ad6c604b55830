use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::error::AuthError;

/// A signed-in account as reported by the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    /// When the provider-side profile last changed.
    pub updated_at: DateTime<Utc>,
}

/// External authentication service: imperative sign-in/up/out plus a
/// change stream carrying the current user.
///
/// The stream is a watch channel: subscribers always observe the latest
/// state (`None` means signed out), never a backlog of intermediate ones.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and sign it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    /// Sign in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    /// Sign out the current user, if any.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Update the signed-in account's display name; re-notifies the stream.
    async fn update_display_name(&self, name: &str) -> Result<(), AuthError>;

    /// Subscribe to auth-state changes.
    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>>;

    /// Snapshot of the current user.
    fn current_user(&self) -> Option<AuthUser>;
}
