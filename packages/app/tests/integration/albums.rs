use app::error::AppError;
use app::models::NewAlbum;

use crate::common::TestApp;

#[tokio::test]
async fn create_and_get_album() {
    let app = TestApp::spawn();
    let album_id = app
        .gallery()
        .create_album(NewAlbum {
            title: "  Trip  ".into(),
            description: "Summer by the sea".into(),
            user_id: "u1".into(),
            photo_count: 3,
        })
        .await
        .unwrap();

    let album = app.gallery().get_album(&album_id).await.unwrap();
    assert_eq!(album.title, "Trip");
    assert_eq!(album.description, "Summer by the sea");
    assert_eq!(album.user_id, "u1");
    assert_eq!(album.photo_count, 3);
    assert_eq!(album.cover_url, None);
}

#[tokio::test]
async fn create_album_requires_a_title() {
    let app = TestApp::spawn();
    let result = app
        .gallery()
        .create_album(NewAlbum {
            title: "   ".into(),
            description: String::new(),
            user_id: "u1".into(),
            photo_count: 0,
        })
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn get_missing_album_is_not_found() {
    let app = TestApp::spawn();
    let result = app.gallery().get_album("nope").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn user_albums_are_owner_filtered_and_newest_first() {
    let app = TestApp::spawn();
    let first = app.create_album("alice", "First").await;
    let second = app.create_album("alice", "Second").await;
    app.create_album("bob", "Not hers").await;

    let albums = app.gallery().get_user_albums("alice").await.unwrap();
    let ids: Vec<_> = albums.iter().map(|a| a.id.clone()).collect();
    assert_eq!(ids, vec![second, first]);
    assert!(albums.iter().all(|a| a.user_id == "alice"));
}

#[tokio::test]
async fn album_cover_is_recorded() {
    let app = TestApp::spawn();
    let album_id = app.create_album("alice", "Covers").await;
    let (_, url) = app.add_photo(&album_id, "alice", "cover.jpg").await;

    app.gallery()
        .set_album_cover(&album_id, &url)
        .await
        .unwrap();
    let album = app.gallery().get_album(&album_id).await.unwrap();
    assert_eq!(album.cover_url.as_deref(), Some(url.as_str()));
}

#[tokio::test]
async fn delete_album_cascades_to_photos_and_objects() {
    let app = TestApp::spawn();
    let album_id = app.create_album("alice", "Doomed").await;
    app.add_photo(&album_id, "alice", "one.jpg").await;
    app.add_photo(&album_id, "alice", "two.jpg").await;
    assert_eq!(app.objects.len(), 2);

    app.gallery().delete_album(&album_id).await.unwrap();

    let photos = app.gallery().get_album_photos(&album_id).await.unwrap();
    assert!(photos.is_empty());
    let album = app.gallery().get_album(&album_id).await;
    assert!(matches!(album, Err(AppError::NotFound(_))));
    assert!(app.objects.is_empty());
}

#[tokio::test]
async fn storage_failure_never_blocks_album_deletion() {
    let app = TestApp::spawn();
    let album_id = app.create_album("alice", "Sticky").await;
    app.add_photo(&album_id, "alice", "stuck.jpg").await;

    app.objects.fail_deletes(true);
    app.gallery().delete_album(&album_id).await.unwrap();

    // Documents are gone even though the object delete was attempted and
    // failed; the dangling object is the documented residual.
    assert!(matches!(
        app.gallery().get_album(&album_id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(app.gallery().get_album_photos(&album_id).await.unwrap().is_empty());
    assert_eq!(app.objects.delete_attempts().len(), 1);
    assert_eq!(app.objects.len(), 1);
}
