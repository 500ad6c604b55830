use common::auth::AuthError;
use common::storage::StorageError;
use common::store::StoreError;
use thiserror::Error;

/// Application-level error type.
///
/// Screens catch these at the boundary and present the message; nothing
/// below the screens swallows a failure, except the deliberate best-effort
/// storage deletions in [`crate::gallery::Gallery`].
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("not allowed: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    Validation(String),

    /// The backend rejected a document write.
    #[error("write rejected: {0}")]
    Write(#[source] StoreError),

    /// The backend rejected an object upload.
    #[error("upload failed: {0}")]
    Upload(#[source] StorageError),

    /// A document read or decode failed.
    #[error("backend read failed: {0}")]
    Read(#[source] StoreError),

    /// Identity provider failure, surfaced unchanged.
    #[error(transparent)]
    Auth(#[from] AuthError),
}
