use tracing::error;

use crate::gallery::Gallery;
use crate::models::FeedPhoto;
use crate::shell::{Nav, Route};

use super::Loadable;

/// The reverse-chronological, cross-user feed.
pub struct FeedScreen {
    photos: Loadable<Vec<FeedPhoto>>,
}

impl FeedScreen {
    /// Fetch the feed; errors land in the screen state, not the caller.
    pub async fn load(gallery: &Gallery) -> Self {
        let photos = match gallery.get_feed_photos(None).await {
            Ok(photos) => Loadable::Loaded(photos),
            Err(e) => {
                error!(error = %e, "failed to fetch feed");
                Loadable::Failed(e.to_string())
            }
        };
        Self { photos }
    }

    pub async fn refresh(&mut self, gallery: &Gallery) {
        *self = Self::load(gallery).await;
    }

    pub fn photos(&self) -> Option<&[FeedPhoto]> {
        self.photos.loaded().map(Vec::as_slice)
    }

    /// Open the album a feed row belongs to, jumping to the selected
    /// photo.
    pub fn select(&self, index: usize) -> Option<Nav> {
        let entry = self.photos.loaded()?.get(index)?;
        Some(Nav::Push(Route::AlbumDetail {
            album_id: entry.photo.album_id.clone(),
            photo_id: Some(entry.photo.id.clone()),
        }))
    }

    pub fn render(&self) -> String {
        match &self.photos {
            Loadable::Loading => "Loading feed...".into(),
            Loadable::Failed(message) => format!("Error: {message}"),
            Loadable::Loaded(photos) if photos.is_empty() => {
                "No photos yet!\nCreate an album and start sharing".into()
            }
            Loadable::Loaded(photos) => {
                let mut out = String::from("Feed\n");
                for (i, entry) in photos.iter().enumerate() {
                    let username = entry.user.as_ref().map_or("Unknown", |u| u.username.as_str());
                    let album = entry.album.as_ref().map_or("Untitled", |a| a.title.as_str());
                    out.push_str(&format!(
                        "{:>3}. {} in \"{}\" ({} likes) {}\n",
                        i + 1,
                        username,
                        album,
                        entry.photo.like_count,
                        entry.photo.thumbnail(),
                    ));
                }
                out
            }
        }
    }
}
