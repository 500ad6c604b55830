use chrono::{DateTime, Utc};
use common::store::{Document, StoreError};
use serde::{Deserialize, Serialize};

/// A comment on one photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(skip)]
    pub id: String,

    pub photo_id: String,
    pub user_id: String,
    pub text: String,

    #[serde(skip, default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn from_doc(doc: Document) -> Result<Self, StoreError> {
        let mut comment: Comment = super::decode(doc.fields)?;
        comment.id = doc.id;
        comment.created_at = doc.create_time;
        Ok(comment)
    }
}
