use std::collections::HashMap;
use std::sync::RwLock;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::Argon2;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::watch;
use uuid::Uuid;

use super::error::AuthError;
use super::traits::{AuthUser, IdentityProvider};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    uid: String,
    email: String,
    password_hash: String,
    display_name: Option<String>,
    updated_at: chrono::DateTime<Utc>,
}

impl Account {
    fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            uid: self.uid.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// Process-local identity provider with argon2-hashed credentials.
///
/// Holds at most one signed-in user at a time, like a device-bound auth
/// SDK, and notifies subscribers through a watch channel.
pub struct LocalIdentityProvider {
    /// Accounts keyed by normalized (trimmed, lowercased) email.
    accounts: RwLock<HashMap<String, Account>>,
    state: watch::Sender<Option<AuthUser>>,
}

impl Default for LocalIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalIdentityProvider {
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self {
            accounts: RwLock::new(HashMap::new()),
            state,
        }
    }

    fn normalize_email(email: &str) -> Result<String, AuthError> {
        let email = email.trim();
        let (local, domain) = email
            .split_once('@')
            .ok_or_else(|| AuthError::InvalidEmail(email.to_string()))?;
        if local.is_empty() || domain.is_empty() || !domain.contains('.') {
            return Err(AuthError::InvalidEmail(email.to_string()));
        }
        Ok(email.to_lowercase())
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("password hash error: {e}")))
}

fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AuthError::Internal(format!("stored hash is malformed: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let key = Self::normalize_email(email)?;
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let password_hash = hash_password(password)?;
        let account = Account {
            uid: Uuid::new_v4().to_string(),
            email: key.clone(),
            password_hash,
            display_name: None,
            updated_at: Utc::now(),
        };

        let user = {
            let mut accounts = self.accounts.write().unwrap_or_else(|e| e.into_inner());
            if accounts.contains_key(&key) {
                return Err(AuthError::EmailTaken(key));
            }
            let user = account.to_auth_user();
            accounts.insert(key, account);
            user
        };

        self.state.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let key = Self::normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = {
            let accounts = self.accounts.read().unwrap_or_else(|e| e.into_inner());
            let account = accounts.get(&key).ok_or(AuthError::InvalidCredentials)?;
            if !verify_password(password, &account.password_hash)? {
                return Err(AuthError::InvalidCredentials);
            }
            account.to_auth_user()
        };

        self.state.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.state.send_replace(None);
        Ok(())
    }

    async fn update_display_name(&self, name: &str) -> Result<(), AuthError> {
        let current = self.current_user().ok_or(AuthError::NotSignedIn)?;

        let user = {
            let mut accounts = self.accounts.write().unwrap_or_else(|e| e.into_inner());
            let account = accounts
                .values_mut()
                .find(|a| a.uid == current.uid)
                .ok_or(AuthError::NotSignedIn)?;
            account.display_name = Some(name.to_string());
            account.updated_at = Utc::now();
            account.to_auth_user()
        };

        self.state.send_replace(Some(user));
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.state.subscribe()
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.state.borrow().clone()
    }
}
