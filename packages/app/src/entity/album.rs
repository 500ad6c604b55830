use chrono::{DateTime, Utc};
use common::store::{Document, StoreError};
use serde::{Deserialize, Serialize};

/// An album document: a named collection of photos owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    #[serde(skip)]
    pub id: String,

    pub title: String,
    #[serde(default)]
    pub description: String,
    pub user_id: String,
    #[serde(default)]
    pub photo_count: u32,
    #[serde(default)]
    pub cover_url: Option<String>,

    #[serde(skip, default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(skip, default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Album {
    pub fn from_doc(doc: Document) -> Result<Self, StoreError> {
        let mut album: Album = super::decode(doc.fields)?;
        album.id = doc.id;
        album.created_at = doc.create_time;
        album.updated_at = doc.update_time;
        Ok(album)
    }
}
