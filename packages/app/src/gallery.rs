use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use futures::future::join_all;
use serde_json::{Value, json};
use tracing::{instrument, warn};

use common::storage::ObjectStore;
use common::store::{Direction, DocRef, DocumentStore, Query, StoreError, fields};

use crate::entity::collections::{ALBUMS, COMMENTS, PHOTOS, USERS};
use crate::entity::{Album, Comment, Photo, User};
use crate::error::AppError;
use crate::models::{CommentView, FeedPhoto, NewAlbum, NewPhoto};

const MAX_ALBUM_TITLE_LEN: usize = 120;
const MAX_COMMENT_LEN: usize = 500;

/// Single point of contact between the screens and the backend platform.
///
/// Every operation is atomic from the caller's point of view: it either
/// fully applies or surfaces an [`AppError`]. The lone exception is the
/// documented best-effort deletion of storage objects during cascading
/// deletes, which is logged and never propagated.
pub struct Gallery {
    store: Arc<dyn DocumentStore>,
    objects: Arc<dyn ObjectStore>,
    feed_page_size: usize,
}

impl Gallery {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        objects: Arc<dyn ObjectStore>,
        feed_page_size: usize,
    ) -> Self {
        Self {
            store,
            objects,
            feed_page_size,
        }
    }

    // -- Albums --------------------------------------------------------------

    /// Create a new album; returns its id.
    #[instrument(skip(self, album), fields(user_id = %album.user_id))]
    pub async fn create_album(&self, album: NewAlbum) -> Result<String, AppError> {
        let title = album.title.trim();
        if title.is_empty() || title.chars().count() > MAX_ALBUM_TITLE_LEN {
            return Err(AppError::Validation(format!(
                "Album title must be 1-{MAX_ALBUM_TITLE_LEN} characters"
            )));
        }

        let doc = self
            .store
            .insert(
                ALBUMS,
                fields(json!({
                    "title": title,
                    "description": album.description.trim(),
                    "userId": album.user_id,
                    "photoCount": album.photo_count,
                    "coverUrl": Value::Null,
                })),
            )
            .await
            .map_err(AppError::Write)?;
        Ok(doc.id)
    }

    /// Fetch one album.
    #[instrument(skip(self))]
    pub async fn get_album(&self, album_id: &str) -> Result<Album, AppError> {
        let doc = self
            .store
            .get(ALBUMS, album_id)
            .await
            .map_err(AppError::Read)?
            .ok_or_else(|| AppError::NotFound("Album not found".into()))?;
        Album::from_doc(doc).map_err(AppError::Read)
    }

    /// Albums owned by `user_id`, newest first.
    #[instrument(skip(self))]
    pub async fn get_user_albums(&self, user_id: &str) -> Result<Vec<Album>, AppError> {
        let docs = self
            .store
            .query(
                ALBUMS,
                Query::new()
                    .filter("userId", user_id)
                    .order_created(Direction::Descending),
            )
            .await
            .map_err(AppError::Read)?;
        docs.into_iter()
            .map(|doc| Album::from_doc(doc).map_err(AppError::Read))
            .collect()
    }

    /// Record the album's cover image.
    #[instrument(skip(self, url))]
    pub async fn set_album_cover(&self, album_id: &str, url: &str) -> Result<(), AppError> {
        let url = url.to_string();
        self.store
            .update_in_txn(ALBUMS, album_id, &|fields| {
                fields.insert("coverUrl".into(), Value::String(url.clone()));
            })
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => AppError::NotFound("Album not found".into()),
                other => AppError::Write(other),
            })?;
        Ok(())
    }

    /// Delete an album, every photo in it, and (best-effort) their stored
    /// images.
    ///
    /// The album and photo documents go in one atomic batch. Losing an
    /// image object is an accepted residual; losing the documents is not.
    #[instrument(skip(self))]
    pub async fn delete_album(&self, album_id: &str) -> Result<(), AppError> {
        let photos = self
            .store
            .query(PHOTOS, Query::new().filter("albumId", album_id))
            .await
            .map_err(AppError::Read)?;

        let mut batch = vec![DocRef::new(ALBUMS, album_id)];
        for doc in &photos {
            batch.push(DocRef::new(PHOTOS, doc.id.clone()));
        }
        self.store
            .delete_batch(&batch)
            .await
            .map_err(AppError::Write)?;

        for doc in &photos {
            if let Some(url) = doc.fields.get("imageUrl").and_then(Value::as_str) {
                self.delete_image(url).await;
            }
        }
        Ok(())
    }

    // -- Photos --------------------------------------------------------------

    /// Upload a local image under `photos/{photo_id}`; returns its public
    /// URL.
    #[instrument(skip(self, local_path))]
    pub async fn upload_photo(
        &self,
        local_path: &Path,
        photo_id: &str,
    ) -> Result<String, AppError> {
        self.objects
            .upload(&format!("photos/{photo_id}"), local_path)
            .await
            .map_err(AppError::Upload)
    }

    /// Register an uploaded photo; the like set starts empty.
    #[instrument(skip(self, photo), fields(album_id = %photo.album_id))]
    pub async fn add_photo(&self, photo: NewPhoto) -> Result<String, AppError> {
        // The parent album must exist at creation time.
        self.get_album(&photo.album_id).await?;

        let doc = self
            .store
            .insert(
                PHOTOS,
                fields(json!({
                    "albumId": photo.album_id,
                    "userId": photo.user_id,
                    "imageUrl": photo.image_url,
                    "thumbnailUrl": photo.thumbnail_url,
                    "likes": [],
                    "likeCount": 0,
                    "metadata": photo.metadata,
                })),
            )
            .await
            .map_err(AppError::Write)?;
        Ok(doc.id)
    }

    /// Photos in an album, oldest first.
    #[instrument(skip(self))]
    pub async fn get_album_photos(&self, album_id: &str) -> Result<Vec<Photo>, AppError> {
        let docs = self
            .store
            .query(
                PHOTOS,
                Query::new()
                    .filter("albumId", album_id)
                    .order_created(Direction::Ascending),
            )
            .await
            .map_err(AppError::Read)?;
        docs.into_iter()
            .map(|doc| Photo::from_doc(doc).map_err(AppError::Read))
            .collect()
    }

    /// Delete a photo document, then best-effort its stored image.
    #[instrument(skip(self, image_url))]
    pub async fn delete_photo(&self, photo_id: &str, image_url: &str) -> Result<(), AppError> {
        self.store
            .delete(PHOTOS, photo_id)
            .await
            .map_err(AppError::Write)?;
        self.delete_image(image_url).await;
        Ok(())
    }

    // -- Social --------------------------------------------------------------

    /// Toggle `user_id`'s like on a photo; returns the resulting
    /// membership (`true` = now liked).
    ///
    /// The read-modify-write runs inside the store's transaction
    /// primitive, which retries on write conflict, so concurrent togglers
    /// never lose an update.
    #[instrument(skip(self))]
    pub async fn toggle_like(&self, photo_id: &str, user_id: &str) -> Result<bool, AppError> {
        let uid = user_id.to_string();
        let doc = self
            .store
            .update_in_txn(PHOTOS, photo_id, &|fields| {
                let mut likes: Vec<String> = fields
                    .get("likes")
                    .and_then(|v| serde_json::from_value(v.clone()).ok())
                    .unwrap_or_default();
                match likes.iter().position(|id| *id == uid) {
                    Some(i) => {
                        likes.remove(i);
                    }
                    None => likes.push(uid.clone()),
                }
                fields.insert("likeCount".into(), json!(likes.len()));
                fields.insert("likes".into(), json!(likes));
            })
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => AppError::NotFound("Photo not found".into()),
                other => AppError::Write(other),
            })?;

        let photo = Photo::from_doc(doc).map_err(AppError::Read)?;
        Ok(photo.liked_by(user_id))
    }

    /// Append a comment to a photo.
    #[instrument(skip(self, text))]
    pub async fn add_comment(
        &self,
        photo_id: &str,
        user_id: &str,
        text: &str,
    ) -> Result<String, AppError> {
        let text = text.trim();
        if text.is_empty() || text.chars().count() > MAX_COMMENT_LEN {
            return Err(AppError::Validation(format!(
                "Comment must be 1-{MAX_COMMENT_LEN} characters"
            )));
        }

        let doc = self
            .store
            .insert(
                COMMENTS,
                fields(json!({
                    "photoId": photo_id,
                    "userId": user_id,
                    "text": text,
                })),
            )
            .await
            .map_err(AppError::Write)?;
        Ok(doc.id)
    }

    /// Comments on a photo, oldest first, each with its author's profile.
    #[instrument(skip(self))]
    pub async fn get_photo_comments(&self, photo_id: &str) -> Result<Vec<CommentView>, AppError> {
        let docs = self
            .store
            .query(
                COMMENTS,
                Query::new()
                    .filter("photoId", photo_id)
                    .order_created(Direction::Ascending),
            )
            .await
            .map_err(AppError::Read)?;
        let comments: Vec<Comment> = docs
            .into_iter()
            .map(|doc| Comment::from_doc(doc).map_err(AppError::Read))
            .collect::<Result<_, _>>()?;

        let users = self
            .user_profiles(comments.iter().map(|c| c.user_id.as_str()))
            .await;
        Ok(comments
            .into_iter()
            .map(|comment| CommentView {
                user: users.get(&comment.user_id).cloned(),
                comment,
            })
            .collect())
    }

    /// Delete a comment; only its author may.
    #[instrument(skip(self))]
    pub async fn delete_comment(&self, comment_id: &str, user_id: &str) -> Result<(), AppError> {
        let doc = self
            .store
            .get(COMMENTS, comment_id)
            .await
            .map_err(AppError::Read)?
            .ok_or_else(|| AppError::NotFound("Comment not found".into()))?;
        let comment = Comment::from_doc(doc).map_err(AppError::Read)?;

        if comment.user_id != user_id {
            return Err(AppError::Unauthorized(
                "Only the comment's author may delete it".into(),
            ));
        }

        self.store
            .delete(COMMENTS, comment_id)
            .await
            .map_err(AppError::Write)?;
        Ok(())
    }

    // -- Feed ----------------------------------------------------------------

    /// The most recent photos across all albums, enriched with album and
    /// owner for rendering. `None` falls back to the configured page size.
    #[instrument(skip(self))]
    pub async fn get_feed_photos(&self, limit: Option<usize>) -> Result<Vec<FeedPhoto>, AppError> {
        let limit = limit.unwrap_or(self.feed_page_size);
        let docs = self
            .store
            .query(
                PHOTOS,
                Query::new()
                    .order_created(Direction::Descending)
                    .limit(limit),
            )
            .await
            .map_err(AppError::Read)?;
        let photos: Vec<Photo> = docs
            .into_iter()
            .map(|doc| Photo::from_doc(doc).map_err(AppError::Read))
            .collect::<Result<_, _>>()?;

        let albums = self
            .albums_by_id(photos.iter().map(|p| p.album_id.as_str()))
            .await;
        let users = self
            .user_profiles(photos.iter().map(|p| p.user_id.as_str()))
            .await;

        Ok(photos
            .into_iter()
            .map(|photo| FeedPhoto {
                album: albums.get(&photo.album_id).cloned(),
                user: users.get(&photo.user_id).cloned(),
                photo,
            })
            .collect())
    }

    // -- Users ---------------------------------------------------------------

    /// Fetch a user's profile document.
    #[instrument(skip(self))]
    pub async fn get_user_profile(&self, user_id: &str) -> Result<User, AppError> {
        let doc = self
            .store
            .get(USERS, user_id)
            .await
            .map_err(AppError::Read)?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        User::from_doc(doc).map_err(AppError::Read)
    }

    // -- Enrichment ----------------------------------------------------------
    //
    // One lookup per distinct id, issued concurrently. All enrichment goes
    // through these two helpers, so a batched backend read could replace
    // the fan-out without touching any call site.

    /// Best-effort storage deletion; failure is logged, never propagated.
    async fn delete_image(&self, url: &str) {
        if let Err(e) = self.objects.delete_by_url(url).await {
            warn!(url, error = %e, "failed to delete image from storage");
        }
    }

    /// Resolve profiles for a set of user ids. Unresolvable ids are
    /// absent from the result; a feed or comment row must not fail
    /// because its author's document is gone.
    async fn user_profiles<'a>(
        &self,
        ids: impl Iterator<Item = &'a str>,
    ) -> HashMap<String, User> {
        let mut distinct: Vec<&str> = ids.collect();
        distinct.sort_unstable();
        distinct.dedup();

        let lookups = join_all(
            distinct
                .into_iter()
                .map(|id| async move { (id, self.store.get(USERS, id).await) }),
        )
        .await;

        let mut out = HashMap::new();
        for (id, result) in lookups {
            match result {
                Ok(Some(doc)) => {
                    if let Ok(user) = User::from_doc(doc) {
                        out.insert(id.to_string(), user);
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(user_id = id, error = %e, "failed to load user profile"),
            }
        }
        out
    }

    /// Resolve albums for a set of album ids, same contract as
    /// [`Self::user_profiles`].
    async fn albums_by_id<'a>(
        &self,
        ids: impl Iterator<Item = &'a str>,
    ) -> HashMap<String, Album> {
        let mut distinct: Vec<&str> = ids.collect();
        distinct.sort_unstable();
        distinct.dedup();

        let lookups = join_all(
            distinct
                .into_iter()
                .map(|id| async move { (id, self.store.get(ALBUMS, id).await) }),
        )
        .await;

        let mut out = HashMap::new();
        for (id, result) in lookups {
            match result {
                Ok(Some(doc)) => {
                    if let Ok(album) = Album::from_doc(doc) {
                        out.insert(id.to_string(), album);
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(album_id = id, error = %e, "failed to load album"),
            }
        }
        out
    }
}
