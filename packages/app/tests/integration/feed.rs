use crate::common::TestApp;

#[tokio::test]
async fn feed_is_newest_first_and_limited() {
    let app = TestApp::spawn();
    let album_id = app.create_album("alice", "Stream").await;
    let mut ids = Vec::new();
    for i in 0..5 {
        let (id, _) = app.add_photo(&album_id, "alice", &format!("{i}.jpg")).await;
        ids.push(id);
    }

    let feed = app.gallery().get_feed_photos(Some(3)).await.unwrap();
    let feed_ids: Vec<_> = feed.iter().map(|entry| entry.photo.id.clone()).collect();
    ids.reverse();
    assert_eq!(feed_ids, ids[0..3].to_vec());
}

#[tokio::test]
async fn feed_spans_albums_and_users() {
    let app = TestApp::spawn();
    let alices = app.create_album("alice", "Hers").await;
    let bobs = app.create_album("bob", "His").await;
    app.add_photo(&alices, "alice", "a.jpg").await;
    app.add_photo(&bobs, "bob", "b.jpg").await;

    let feed = app.gallery().get_feed_photos(None).await.unwrap();
    assert_eq!(feed.len(), 2);
}

#[tokio::test]
async fn feed_entries_are_enriched_end_to_end() {
    let app = TestApp::spawn();
    let alice = app.register_user("alice@example.com", "alice").await;
    let album_id = app.create_album(&alice, "Trip").await;
    let (photo_id, _) = app.add_photo(&album_id, &alice, "beach.jpg").await;

    let feed = app.gallery().get_feed_photos(Some(10)).await.unwrap();
    let entry = feed
        .iter()
        .find(|entry| entry.photo.id == photo_id)
        .expect("the new photo should be in the feed");

    assert_eq!(entry.album.as_ref().map(|a| a.title.as_str()), Some("Trip"));
    assert_eq!(
        entry.user.as_ref().map(|u| u.username.as_str()),
        Some("alice")
    );
}

#[tokio::test]
async fn feed_rows_survive_missing_relations() {
    let app = TestApp::spawn();
    let alice = app.register_user("alice@example.com", "alice").await;
    let album_id = app.create_album(&alice, "Fragile").await;
    app.add_photo(&album_id, &alice, "f.jpg").await;

    // The owner's profile document disappears; the row must still render.
    use common::store::DocumentStore;
    app.store.delete("users", &alice).await.unwrap();

    let feed = app.gallery().get_feed_photos(None).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert!(feed[0].user.is_none());
    assert_eq!(
        feed[0].album.as_ref().map(|a| a.title.as_str()),
        Some("Fragile")
    );
}

#[tokio::test]
async fn profile_lookups_are_shared_across_feed_rows() {
    let app = TestApp::spawn();
    let alice = app.register_user("alice@example.com", "alice").await;
    let album_id = app.create_album(&alice, "Repeat").await;
    for i in 0..4 {
        app.add_photo(&album_id, &alice, &format!("{i}.jpg")).await;
    }

    let feed = app.gallery().get_feed_photos(None).await.unwrap();
    assert_eq!(feed.len(), 4);
    assert!(
        feed.iter()
            .all(|entry| entry.user.as_ref().map(|u| u.username.as_str()) == Some("alice"))
    );
}
