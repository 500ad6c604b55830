//! View screens: fetch on mount, hold local load state, render as text,
//! dispatch navigation.
//!
//! Screens catch access-layer errors at their boundary and turn them into
//! a rendered message; nothing here propagates a fetch failure upward.

mod album_detail;
mod create_album;
mod feed;
mod login;
mod photo_viewer;
mod profile;
mod register;

pub use album_detail::AlbumDetailScreen;
pub use create_album::CreateAlbumScreen;
pub use feed::FeedScreen;
pub use login::LoginScreen;
pub use photo_viewer::PhotoViewerScreen;
pub use profile::{ProfileScreen, ProfileTab};
pub use register::RegisterScreen;

/// Load lifecycle for a screen's data: loading → loaded | failed.
#[derive(Debug, Clone)]
pub enum Loadable<T> {
    Loading,
    Loaded(T),
    /// Fetch failed; the message is shown to the user.
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }
}
