use app::screens::{
    AlbumDetailScreen, CreateAlbumScreen, FeedScreen, LoginScreen, PhotoViewerScreen,
    ProfileScreen,
};
use app::shell::{Nav, Route, Tab};

use crate::common::TestApp;

#[tokio::test]
async fn feed_screen_renders_enriched_rows() {
    let app = TestApp::spawn();
    let alice = app.register_user("alice@example.com", "alice").await;
    let album_id = app.create_album(&alice, "Trip").await;
    app.add_photo(&album_id, &alice, "beach.jpg").await;

    let screen = FeedScreen::load(app.gallery()).await;
    let rendered = screen.render();
    assert!(rendered.contains("alice"));
    assert!(rendered.contains("Trip"));

    let nav = screen.select(0).expect("row 0 exists");
    assert!(matches!(nav, Nav::Push(Route::AlbumDetail { .. })));
}

#[tokio::test]
async fn feed_screen_reports_an_empty_feed() {
    let app = TestApp::spawn();
    let screen = FeedScreen::load(app.gallery()).await;
    assert!(screen.render().contains("No photos yet"));
    assert!(screen.select(0).is_none());
}

#[tokio::test]
async fn album_detail_jumps_to_the_selected_photo() {
    let app = TestApp::spawn();
    let album_id = app.create_album("alice", "Jump").await;
    app.add_photo(&album_id, "alice", "0.jpg").await;
    let (target, _) = app.add_photo(&album_id, "alice", "1.jpg").await;

    let (screen, nav) = AlbumDetailScreen::load(app.gallery(), &album_id, Some(&target)).await;
    match nav {
        Some(Nav::Push(Route::PhotoViewer {
            photos,
            initial_index,
        })) => {
            assert_eq!(photos.len(), 2);
            assert_eq!(initial_index, 1);
        }
        other => panic!("expected a viewer jump, got {other:?}"),
    }
    assert!(screen.render().contains("Jump"));
    assert!(screen.render().contains("2 photos"));
}

#[tokio::test]
async fn album_detail_delete_is_owner_gated() {
    let app = TestApp::spawn();
    let album_id = app.create_album("alice", "Guarded").await;
    app.add_photo(&album_id, "alice", "g.jpg").await;

    let (screen, _) = AlbumDetailScreen::load(app.gallery(), &album_id, None).await;
    assert!(screen.owned_by("alice"));
    assert!(!screen.owned_by("bob"));

    let denied = screen.delete(app.gallery(), "bob").await;
    assert!(denied.is_err());

    let nav = screen.delete(app.gallery(), "alice").await.unwrap();
    assert_eq!(nav, Nav::Back);
    assert!(app.gallery().get_album(&album_id).await.is_err());
}

#[tokio::test]
async fn create_album_uploads_all_images_and_sets_the_cover() {
    let app = TestApp::spawn();
    let alice = app.register_user("alice@example.com", "alice").await;

    let mut screen = CreateAlbumScreen::new();
    screen.title = "Weekend".into();
    screen.description = "Two days off".into();
    screen.pick_image(app.local_image("sat.jpg"));
    screen.pick_image(app.local_image("sun.jpg"));

    let nav = screen.submit(app.gallery(), &alice).await.unwrap();
    assert_eq!(nav, Nav::Tab(Tab::Feed));
    // The form resets after a successful submit.
    assert!(screen.title.is_empty());
    assert!(screen.images.is_empty());

    let albums = app.gallery().get_user_albums(&alice).await.unwrap();
    assert_eq!(albums.len(), 1);
    let album = &albums[0];
    assert_eq!(album.title, "Weekend");
    assert_eq!(album.photo_count, 2);

    let photos = app.gallery().get_album_photos(&album.id).await.unwrap();
    assert_eq!(photos.len(), 2);
    // The first *picked* image is the cover; concurrent uploads may land
    // in the store in either order.
    let first_picked = photos
        .iter()
        .find(|p| p.metadata.original_name.as_deref() == Some("sat.jpg"))
        .expect("sat.jpg was uploaded");
    assert_eq!(album.cover_url.as_deref(), Some(first_picked.image_url.as_str()));
    assert_eq!(app.objects.len(), 2);
}

#[tokio::test]
async fn create_album_validates_before_touching_the_backend() {
    let app = TestApp::spawn();
    let mut screen = CreateAlbumScreen::new();

    assert!(screen.submit(app.gallery(), "alice").await.is_err());

    screen.title = "No photos".into();
    assert!(screen.submit(app.gallery(), "alice").await.is_err());

    assert!(app.gallery().get_user_albums("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn photo_viewer_drives_likes_and_comments() {
    let app = TestApp::spawn();
    let alice = app.register_user("alice@example.com", "alice").await;
    let album_id = app.create_album(&alice, "Social").await;
    app.add_photo(&album_id, &alice, "s.jpg").await;

    let photos = app.gallery().get_album_photos(&album_id).await.unwrap();
    let mut screen = PhotoViewerScreen::new(photos, 0);
    assert_eq!(screen.counter(), "1 of 1");

    let liked = screen.toggle_like(app.gallery(), &alice).await.unwrap();
    assert!(liked);
    assert!(screen.render(&alice).contains("1 likes"));

    screen
        .add_comment(app.gallery(), &alice, "what a day")
        .await
        .unwrap();
    let comments = screen.comments().expect("comments loaded after add");
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].comment.text, "what a day");

    screen
        .delete_comment(app.gallery(), &alice, 0)
        .await
        .unwrap();
    assert!(screen.comments().expect("reloaded").is_empty());
}

#[tokio::test]
async fn photo_viewer_delete_removes_and_goes_back() {
    let app = TestApp::spawn();
    let album_id = app.create_album("alice", "Gone").await;
    app.add_photo(&album_id, "alice", "g.jpg").await;

    let photos = app.gallery().get_album_photos(&album_id).await.unwrap();
    let mut screen = PhotoViewerScreen::new(photos, 0);

    let denied = screen.delete_photo(app.gallery(), "bob").await;
    assert!(denied.is_err());

    let nav = screen.delete_photo(app.gallery(), "alice").await.unwrap();
    assert_eq!(nav, Nav::Back);
    assert!(app.gallery().get_album_photos(&album_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn profile_gathers_albums_and_their_photos() {
    let app = TestApp::spawn();
    let alice = app.register_user("alice@example.com", "alice").await;
    let first = app.create_album(&alice, "One").await;
    let second = app.create_album(&alice, "Two").await;
    app.add_photo(&first, &alice, "1a.jpg").await;
    app.add_photo(&second, &alice, "2a.jpg").await;
    app.add_photo(&second, &alice, "2b.jpg").await;

    let user = app.session().current().user.unwrap();
    let screen = ProfileScreen::load(app.gallery(), user).await;

    assert_eq!(screen.albums().unwrap().len(), 2);
    let photos = screen.photos().unwrap();
    assert_eq!(photos.len(), 3);
    // Newest first across albums.
    assert!(
        photos
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at)
    );
    assert!(screen.render().contains("alice"));

    let nav = screen.select_album(0).expect("album row exists");
    assert!(matches!(nav, Nav::Push(Route::AlbumDetail { .. })));
    let nav = screen.select_photo(2).expect("photo row exists");
    assert!(matches!(
        nav,
        Nav::Push(Route::PhotoViewer { initial_index: 2, .. })
    ));
}

#[tokio::test]
async fn login_screen_surfaces_provider_errors() {
    let app = TestApp::spawn();
    app.register_user("alice@example.com", "alice").await;
    app.session().logout().await.unwrap();
    app.wait_for(|state| !state.loading && state.user.is_none())
        .await;

    let mut screen = LoginScreen::new();
    screen.submit(app.session()).await;
    assert!(screen.error.as_deref() == Some("Please fill in all fields"));

    screen.email = "alice@example.com".into();
    screen.password = "wrong-pass".into();
    screen.submit(app.session()).await;
    assert_eq!(screen.error.as_deref(), Some("invalid email or password"));

    screen.password = crate::common::PASSWORD.into();
    screen.submit(app.session()).await;
    assert!(screen.error.is_none());
    app.wait_for(|state| state.user.is_some()).await;
}
