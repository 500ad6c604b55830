use thiserror::Error;

/// Errors surfaced by the identity provider.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account already exists for {0}")]
    EmailTaken(String),

    #[error("password must be at least 6 characters")]
    WeakPassword,

    #[error("malformed email address: {0}")]
    InvalidEmail(String),

    #[error("no user is signed in")]
    NotSignedIn,

    #[error("identity backend error: {0}")]
    Internal(String),
}
