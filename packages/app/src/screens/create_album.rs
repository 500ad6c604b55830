use futures::future::try_join_all;
use uuid::Uuid;

use crate::error::AppError;
use crate::gallery::Gallery;
use crate::models::{LocalImage, NewAlbum, NewPhoto};
use crate::shell::{Nav, Tab};

/// Album creation form: title, description, picked images.
#[derive(Debug, Default)]
pub struct CreateAlbumScreen {
    pub title: String,
    pub description: String,
    pub images: Vec<LocalImage>,
    pub uploading: bool,
}

impl CreateAlbumScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pick_image(&mut self, image: LocalImage) {
        self.images.push(image);
    }

    /// Create the album, then upload and register every picked image
    /// concurrently. On success the form resets and navigation returns
    /// to the feed.
    pub async fn submit(&mut self, gallery: &Gallery, user_id: &str) -> Result<Nav, AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Please enter an album title".into()));
        }
        if self.images.is_empty() {
            return Err(AppError::Validation(
                "Please select at least one photo".into(),
            ));
        }

        self.uploading = true;
        let result = self.create(gallery, user_id).await;
        self.uploading = false;

        result?;
        *self = Self::new();
        Ok(Nav::Tab(Tab::Feed))
    }

    async fn create(&self, gallery: &Gallery, user_id: &str) -> Result<(), AppError> {
        let album_id = gallery
            .create_album(NewAlbum {
                title: self.title.clone(),
                description: self.description.clone(),
                user_id: user_id.to_string(),
                photo_count: self.images.len() as u32,
            })
            .await?;

        let uploads = self.images.iter().map(|image| {
            let album_id = album_id.clone();
            async move {
                let photo_id = Uuid::now_v7().to_string();
                let image_url = gallery.upload_photo(&image.path, &photo_id).await?;
                gallery
                    .add_photo(NewPhoto {
                        album_id,
                        user_id: user_id.to_string(),
                        // Real thumbnail generation is still open; the full
                        // image stands in.
                        thumbnail_url: image_url.clone(),
                        image_url: image_url.clone(),
                        metadata: crate::entity::PhotoMetadata {
                            original_name: image.file_name.clone(),
                            size: image.size,
                        },
                    })
                    .await?;
                Ok::<String, AppError>(image_url)
            }
        });
        let image_urls = try_join_all(uploads).await?;

        // The first picked image becomes the album cover.
        if let Some(url) = image_urls.first() {
            gallery.set_album_cover(&album_id, url).await?;
        }
        Ok(())
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Create album\n");
        out.push_str(&format!("Title: {}\n", self.title));
        out.push_str(&format!("Description: {}\n", self.description));
        out.push_str(&format!("Selected images: {}\n", self.images.len()));
        if self.uploading {
            out.push_str("Uploading...\n");
        }
        out.push_str("Commands: title <text> | desc <text> | add <path> | submit\n");
        out
    }
}
