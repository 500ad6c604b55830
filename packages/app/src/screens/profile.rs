use tracing::{error, warn};

use crate::entity::{Album, Photo};
use crate::error::AppError;
use crate::gallery::Gallery;
use crate::session::{Session, SessionUser};
use crate::shell::{Nav, Route};

use super::Loadable;

/// Which list the profile screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileTab {
    #[default]
    Albums,
    Photos,
}

struct ProfileData {
    albums: Vec<Album>,
    photos: Vec<Photo>,
}

/// The signed-in user's own albums and photos.
pub struct ProfileScreen {
    user: SessionUser,
    state: Loadable<ProfileData>,
    pub tab: ProfileTab,
}

impl ProfileScreen {
    /// Fetch the user's albums, then each album's photos. A single
    /// album's photo load failing is logged and skipped, not fatal.
    pub async fn load(gallery: &Gallery, user: SessionUser) -> Self {
        let state = match gallery.get_user_albums(&user.uid).await {
            Ok(albums) => {
                let mut photos = Vec::new();
                for album in &albums {
                    match gallery.get_album_photos(&album.id).await {
                        Ok(mut album_photos) => photos.append(&mut album_photos),
                        Err(e) => {
                            warn!(album_id = %album.id, error = %e, "failed to load photos for album");
                        }
                    }
                }
                photos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                Loadable::Loaded(ProfileData { albums, photos })
            }
            Err(e) => {
                error!(error = %e, "failed to load profile data");
                Loadable::Failed("Failed to load profile data".into())
            }
        };

        Self {
            user,
            state,
            tab: ProfileTab::default(),
        }
    }

    pub async fn refresh(&mut self, gallery: &Gallery) {
        let reloaded = Self::load(gallery, self.user.clone()).await;
        self.state = reloaded.state;
    }

    pub fn albums(&self) -> Option<&[Album]> {
        self.state.loaded().map(|data| data.albums.as_slice())
    }

    pub fn photos(&self) -> Option<&[Photo]> {
        self.state.loaded().map(|data| data.photos.as_slice())
    }

    /// Open one of the user's albums.
    pub fn select_album(&self, index: usize) -> Option<Nav> {
        let album = self.state.loaded()?.albums.get(index)?;
        Some(Nav::Push(Route::AlbumDetail {
            album_id: album.id.clone(),
            photo_id: None,
        }))
    }

    /// Open the viewer over the user's photo list.
    pub fn select_photo(&self, index: usize) -> Option<Nav> {
        let data = self.state.loaded()?;
        if index >= data.photos.len() {
            return None;
        }
        Some(Nav::Push(Route::PhotoViewer {
            photos: data.photos.clone(),
            initial_index: index,
        }))
    }

    /// Sign out; the shell switches flows via the session channel.
    pub async fn logout(&self, session: &Session) -> Result<(), AppError> {
        session.logout().await
    }

    pub fn render(&self) -> String {
        let username = self.user.username.as_deref().unwrap_or("(no username)");
        let mut out = format!("{} <{}>\n", username, self.user.email);

        match &self.state {
            Loadable::Loading => out.push_str("Loading profile...\n"),
            Loadable::Failed(message) => out.push_str(&format!("Error: {message}\n")),
            Loadable::Loaded(data) => {
                out.push_str(&format!(
                    "{} albums, {} photos\n",
                    data.albums.len(),
                    data.photos.len()
                ));
                match self.tab {
                    ProfileTab::Albums => {
                        for (i, album) in data.albums.iter().enumerate() {
                            out.push_str(&format!(
                                "{:>3}. {} ({} photos)\n",
                                i + 1,
                                album.title,
                                album.photo_count
                            ));
                        }
                    }
                    ProfileTab::Photos => {
                        for (i, photo) in data.photos.iter().enumerate() {
                            out.push_str(&format!("{:>3}. {}\n", i + 1, photo.thumbnail()));
                        }
                    }
                }
            }
        }
        out
    }
}
