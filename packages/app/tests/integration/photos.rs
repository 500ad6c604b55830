use app::error::AppError;
use app::models::NewPhoto;

use crate::common::TestApp;

#[tokio::test]
async fn upload_returns_a_resolvable_url() {
    let app = TestApp::spawn();
    let image = app.local_image("pic.jpg");

    let url = app
        .gallery()
        .upload_photo(&image.path, "abc-123")
        .await
        .unwrap();

    assert_eq!(url, "memory://objects/photos/abc-123");
    assert!(app.objects.contains("photos/abc-123"));
}

#[tokio::test]
async fn add_photo_requires_an_existing_album() {
    let app = TestApp::spawn();
    let result = app
        .gallery()
        .add_photo(NewPhoto {
            album_id: "ghost-album".into(),
            user_id: "u1".into(),
            image_url: "memory://objects/photos/x".into(),
            thumbnail_url: "memory://objects/photos/x".into(),
            metadata: Default::default(),
        })
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn new_photos_start_with_no_likes() {
    let app = TestApp::spawn();
    let album_id = app.create_album("alice", "Fresh").await;
    let (photo_id, url) = app.add_photo(&album_id, "alice", "new.jpg").await;

    let photos = app.gallery().get_album_photos(&album_id).await.unwrap();
    assert_eq!(photos.len(), 1);
    let photo = &photos[0];
    assert_eq!(photo.id, photo_id);
    assert_eq!(photo.image_url, url);
    assert_eq!(photo.thumbnail_url, url);
    assert!(photo.likes.is_empty());
    assert_eq!(photo.like_count, 0);
    assert_eq!(photo.metadata.original_name.as_deref(), Some("new.jpg"));
    assert!(photo.metadata.size.is_some());
}

#[tokio::test]
async fn album_photos_come_back_oldest_first() {
    let app = TestApp::spawn();
    let album_id = app.create_album("alice", "Ordered").await;
    let (first, _) = app.add_photo(&album_id, "alice", "1.jpg").await;
    let (second, _) = app.add_photo(&album_id, "alice", "2.jpg").await;
    let (third, _) = app.add_photo(&album_id, "alice", "3.jpg").await;

    let other_album = app.create_album("alice", "Other").await;
    app.add_photo(&other_album, "alice", "elsewhere.jpg").await;

    let photos = app.gallery().get_album_photos(&album_id).await.unwrap();
    let ids: Vec<_> = photos.iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, vec![first, second, third]);
}

#[tokio::test]
async fn delete_photo_removes_document_and_object() {
    let app = TestApp::spawn();
    let album_id = app.create_album("alice", "Trim").await;
    let (photo_id, url) = app.add_photo(&album_id, "alice", "gone.jpg").await;

    app.gallery().delete_photo(&photo_id, &url).await.unwrap();

    assert!(app.gallery().get_album_photos(&album_id).await.unwrap().is_empty());
    assert!(app.objects.is_empty());
}

#[tokio::test]
async fn delete_photo_survives_a_storage_failure() {
    let app = TestApp::spawn();
    let album_id = app.create_album("alice", "Sticky").await;
    let (photo_id, url) = app.add_photo(&album_id, "alice", "stuck.jpg").await;

    app.objects.fail_deletes(true);
    app.gallery().delete_photo(&photo_id, &url).await.unwrap();

    assert!(app.gallery().get_album_photos(&album_id).await.unwrap().is_empty());
    assert_eq!(app.objects.len(), 1);
}
