use tracing::error;

use crate::entity::Photo;
use crate::error::AppError;
use crate::gallery::Gallery;
use crate::models::CommentView;
use crate::shell::Nav;

use super::Loadable;

/// Full-screen carousel over the photo list handed over by navigation,
/// with likes and comments on the current photo.
pub struct PhotoViewerScreen {
    photos: Vec<Photo>,
    index: usize,
    comments: Loadable<Vec<CommentView>>,
}

impl PhotoViewerScreen {
    pub fn new(photos: Vec<Photo>, initial_index: usize) -> Self {
        let index = initial_index.min(photos.len().saturating_sub(1));
        Self {
            photos,
            index,
            comments: Loadable::Loading,
        }
    }

    pub fn current(&self) -> Option<&Photo> {
        self.photos.get(self.index)
    }

    /// `i of n` position indicator.
    pub fn counter(&self) -> String {
        format!("{} of {}", self.index + 1, self.photos.len())
    }

    pub fn next(&mut self) {
        if self.index + 1 < self.photos.len() {
            self.index += 1;
            self.comments = Loadable::Loading;
        }
    }

    pub fn prev(&mut self) {
        if self.index > 0 {
            self.index -= 1;
            self.comments = Loadable::Loading;
        }
    }

    /// Whether `user_id` owns the current photo.
    pub fn owned_by(&self, user_id: &str) -> bool {
        self.current().is_some_and(|photo| photo.user_id == user_id)
    }

    /// Toggle the signed-in user's like on the current photo; returns the
    /// new membership.
    pub async fn toggle_like(
        &mut self,
        gallery: &Gallery,
        user_id: &str,
    ) -> Result<bool, AppError> {
        let photo_id = self
            .current()
            .map(|photo| photo.id.clone())
            .ok_or_else(|| AppError::NotFound("Photo not found".into()))?;

        let liked = gallery.toggle_like(&photo_id, user_id).await?;

        // Keep the local copy in step so the rendered count is right.
        let photo = &mut self.photos[self.index];
        if liked {
            if !photo.liked_by(user_id) {
                photo.likes.push(user_id.to_string());
            }
        } else {
            photo.likes.retain(|id| id != user_id);
        }
        photo.like_count = photo.likes.len() as u32;
        Ok(liked)
    }

    /// Fetch the current photo's comments.
    pub async fn load_comments(&mut self, gallery: &Gallery) {
        let Some(photo_id) = self.current().map(|photo| photo.id.clone()) else {
            self.comments = Loadable::Loaded(Vec::new());
            return;
        };
        self.comments = match gallery.get_photo_comments(&photo_id).await {
            Ok(comments) => Loadable::Loaded(comments),
            Err(e) => {
                error!(error = %e, "failed to load comments");
                Loadable::Failed(e.to_string())
            }
        };
    }

    pub fn comments(&self) -> Option<&[CommentView]> {
        self.comments.loaded().map(Vec::as_slice)
    }

    /// Add a comment to the current photo and reload the list.
    pub async fn add_comment(
        &mut self,
        gallery: &Gallery,
        user_id: &str,
        text: &str,
    ) -> Result<(), AppError> {
        let photo_id = self
            .current()
            .map(|photo| photo.id.clone())
            .ok_or_else(|| AppError::NotFound("Photo not found".into()))?;
        gallery.add_comment(&photo_id, user_id, text).await?;
        self.load_comments(gallery).await;
        Ok(())
    }

    /// Delete one of the listed comments (1-based index) and reload.
    pub async fn delete_comment(
        &mut self,
        gallery: &Gallery,
        user_id: &str,
        index: usize,
    ) -> Result<(), AppError> {
        let comment_id = self
            .comments
            .loaded()
            .and_then(|comments| comments.get(index))
            .map(|view| view.comment.id.clone())
            .ok_or_else(|| AppError::NotFound("Comment not found".into()))?;
        gallery.delete_comment(&comment_id, user_id).await?;
        self.load_comments(gallery).await;
        Ok(())
    }

    /// Delete the current photo (owner only) and navigate back.
    pub async fn delete_photo(&mut self, gallery: &Gallery, user_id: &str) -> Result<Nav, AppError> {
        let photo = self
            .current()
            .ok_or_else(|| AppError::NotFound("Photo not found".into()))?;
        if photo.user_id != user_id {
            return Err(AppError::Unauthorized(
                "Only the photo's owner may delete it".into(),
            ));
        }
        gallery.delete_photo(&photo.id, &photo.image_url).await?;
        Ok(Nav::Back)
    }

    pub fn render(&self, user_id: &str) -> String {
        let Some(photo) = self.current() else {
            return "No photos".into();
        };

        let mut out = format!("Photo {}\n{}\n", self.counter(), photo.image_url);
        let heart = if photo.liked_by(user_id) { "liked" } else { "not liked" };
        out.push_str(&format!("{} likes ({heart})\n", photo.like_count));

        match &self.comments {
            Loadable::Loading => out.push_str("Comments not loaded (use: comments)\n"),
            Loadable::Failed(message) => out.push_str(&format!("Error: {message}\n")),
            Loadable::Loaded(comments) if comments.is_empty() => {
                out.push_str("No comments yet\n");
            }
            Loadable::Loaded(comments) => {
                out.push_str("Comments:\n");
                for (i, view) in comments.iter().enumerate() {
                    let author = view.user.as_ref().map_or("Unknown", |u| u.username.as_str());
                    out.push_str(&format!("{:>3}. {}: {}\n", i + 1, author, view.comment.text));
                }
            }
        }
        out
    }
}
