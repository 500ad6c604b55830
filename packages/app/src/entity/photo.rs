use chrono::{DateTime, Utc};
use common::store::{Document, StoreError};
use serde::{Deserialize, Serialize};

/// Free-form metadata captured when a photo is uploaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoMetadata {
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// A photo document.
///
/// `likes` holds user ids with set semantics; `like_count` is a
/// denormalized mirror of its length, maintained transactionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(skip)]
    pub id: String,

    pub album_id: String,
    pub user_id: String,
    pub image_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub metadata: PhotoMetadata,

    #[serde(skip, default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Photo {
    pub fn from_doc(doc: Document) -> Result<Self, StoreError> {
        let mut photo: Photo = super::decode(doc.fields)?;
        photo.id = doc.id;
        photo.created_at = doc.create_time;
        Ok(photo)
    }

    /// Whether `user_id` has liked this photo.
    pub fn liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|id| id == user_id)
    }

    /// URL used for grid rendering; falls back to the full image.
    pub fn thumbnail(&self) -> &str {
        if self.thumbnail_url.is_empty() {
            &self.image_url
        } else {
            &self.thumbnail_url
        }
    }
}
