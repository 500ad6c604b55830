use std::path::PathBuf;

use crate::entity::{Album, Comment, Photo, PhotoMetadata, User};

/// Parameters for creating an album.
#[derive(Debug, Clone)]
pub struct NewAlbum {
    pub title: String,
    pub description: String,
    pub user_id: String,
    pub photo_count: u32,
}

/// Parameters for registering an uploaded photo.
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub album_id: String,
    pub user_id: String,
    pub image_url: String,
    pub thumbnail_url: String,
    pub metadata: PhotoMetadata,
}

/// A picked local image awaiting upload.
#[derive(Debug, Clone)]
pub struct LocalImage {
    pub path: PathBuf,
    pub file_name: Option<String>,
    pub size: Option<u64>,
}

/// A feed photo enriched with its album and owner profile.
///
/// Either relation may be absent when the referenced document is gone;
/// the feed renders a fallback rather than failing.
#[derive(Debug, Clone)]
pub struct FeedPhoto {
    pub photo: Photo,
    pub album: Option<Album>,
    pub user: Option<User>,
}

/// A comment enriched with its author's profile.
#[derive(Debug, Clone)]
pub struct CommentView {
    pub comment: Comment,
    pub user: Option<User>,
}
