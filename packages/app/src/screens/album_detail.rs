use crate::entity::{Album, Photo};
use crate::error::AppError;
use crate::gallery::Gallery;
use crate::shell::{Nav, Route};

use super::Loadable;

struct AlbumData {
    album: Album,
    photos: Vec<Photo>,
}

/// One album: header, photo grid, owner actions.
pub struct AlbumDetailScreen {
    album_id: String,
    state: Loadable<AlbumData>,
}

impl AlbumDetailScreen {
    /// Fetch the album and its photos concurrently.
    ///
    /// When navigation carried a `photo_id` (a feed row was selected),
    /// the returned [`Nav`] immediately opens the viewer at that photo.
    pub async fn load(
        gallery: &Gallery,
        album_id: &str,
        photo_id: Option<&str>,
    ) -> (Self, Option<Nav>) {
        let state = match tokio::try_join!(
            gallery.get_album(album_id),
            gallery.get_album_photos(album_id),
        ) {
            Ok((album, photos)) => Loadable::Loaded(AlbumData { album, photos }),
            Err(e) => Loadable::Failed(e.to_string()),
        };

        let screen = Self {
            album_id: album_id.to_string(),
            state,
        };
        let nav = photo_id.and_then(|id| screen.jump_to(id));
        (screen, nav)
    }

    fn jump_to(&self, photo_id: &str) -> Option<Nav> {
        let data = self.state.loaded()?;
        let index = data.photos.iter().position(|p| p.id == photo_id)?;
        Some(open_viewer(&data.photos, index))
    }

    /// Open the viewer at the selected photo.
    pub fn select(&self, index: usize) -> Option<Nav> {
        let data = self.state.loaded()?;
        if index >= data.photos.len() {
            return None;
        }
        Some(open_viewer(&data.photos, index))
    }

    /// Whether `user_id` owns this album.
    pub fn owned_by(&self, user_id: &str) -> bool {
        self.state
            .loaded()
            .is_some_and(|data| data.album.user_id == user_id)
    }

    /// Delete the album and navigate back. Only the owner may.
    pub async fn delete(&self, gallery: &Gallery, user_id: &str) -> Result<Nav, AppError> {
        if !self.owned_by(user_id) {
            return Err(AppError::Unauthorized(
                "Only the album's owner may delete it".into(),
            ));
        }
        gallery.delete_album(&self.album_id).await?;
        Ok(Nav::Back)
    }

    pub fn render(&self) -> String {
        match &self.state {
            Loadable::Loading => "Loading album...".into(),
            Loadable::Failed(message) => format!("Error: {message}"),
            Loadable::Loaded(data) => {
                let mut out = format!("{}\n", data.album.title);
                if !data.album.description.is_empty() {
                    out.push_str(&format!("{}\n", data.album.description));
                }
                let count = data.photos.len();
                out.push_str(&format!(
                    "{} photo{}\n",
                    count,
                    if count == 1 { "" } else { "s" }
                ));
                for (i, photo) in data.photos.iter().enumerate() {
                    out.push_str(&format!("{:>3}. {}\n", i + 1, photo.thumbnail()));
                }
                out
            }
        }
    }
}

fn open_viewer(photos: &[Photo], index: usize) -> Nav {
    Nav::Push(Route::PhotoViewer {
        photos: photos.to_vec(),
        initial_index: index,
    })
}
