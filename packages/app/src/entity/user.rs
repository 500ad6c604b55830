use chrono::{DateTime, Utc};
use common::store::{Document, StoreError};
use serde::{Deserialize, Serialize};

/// A user profile document, keyed by the identity provider's uid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip)]
    pub id: String,

    pub username: String,
    pub email: String,

    #[serde(skip, default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn from_doc(doc: Document) -> Result<Self, StoreError> {
        let mut user: User = super::decode(doc.fields)?;
        user.id = doc.id;
        user.created_at = doc.create_time;
        Ok(user)
    }
}
