use thiserror::Error;

/// Errors that can occur during document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced document does not exist.
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// A transactional update kept colliding with concurrent writers.
    #[error("transaction on {collection}/{id} gave up after {attempts} conflicts")]
    TransactionContention {
        collection: String,
        id: String,
        attempts: u32,
    },

    /// Stored fields could not be decoded into the expected shape.
    #[error("invalid document data: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing service rejected the request.
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }
}
