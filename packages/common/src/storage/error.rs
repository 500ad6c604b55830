use std::fmt;

/// Errors that can occur during object storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// No object exists for the given key or URL.
    NotFound(String),
    /// The key has empty, hidden, or path-traversing segments.
    InvalidKey(String),
    /// The URL was not produced by this store.
    ForeignUrl(String),
    /// An I/O error occurred.
    Io(std::io::Error),
    /// The backing service rejected the request.
    Backend(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(what) => write!(f, "object not found: {what}"),
            Self::InvalidKey(key) => write!(f, "invalid object key: {key}"),
            Self::ForeignUrl(url) => write!(f, "URL does not belong to this store: {url}"),
            Self::Io(err) => write!(f, "storage IO error: {err}"),
            Self::Backend(msg) => write!(f, "storage backend error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
