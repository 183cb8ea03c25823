//! Integration tests for comments and the rating aggregates built on them

mod common;

use axum::http::StatusCode;
use common::{delete, post_empty, post_json, seeded_app, TestApp, ALICE_PASSWORD, BOB_PASSWORD};
use serde_json::{json, Value};

async fn comment(app: &TestApp, token: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    app.send(post_json(uri, &body, Some(token))).await
}

#[tokio::test]
async fn test_song_comment_author_comes_from_token() {
    let app = seeded_app().await;
    let bob = app.login("bob", BOB_PASSWORD).await;

    let (status, body) = comment(
        &app,
        &bob,
        "/songs/s1/comments",
        json!({ "comment": "经典", "star": 5, "user_id": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], 2);
    assert_eq!(body["song_id"], "s1");
    assert_eq!(body["num_like"], 0);
    assert!(body["review_date"].is_string());
    assert!(body["created"].is_string());
}

#[tokio::test]
async fn test_comment_validation() {
    let app = seeded_app().await;
    let alice = app.login("alice", ALICE_PASSWORD).await;

    // Song and album comments need a star in range
    let (status, _) = comment(&app, &alice, "/songs/s1/comments", json!({ "comment": "x" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = comment(
        &app,
        &alice,
        "/songs/s1/comments",
        json!({ "comment": "x", "star": 6 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = comment(
        &app,
        &alice,
        "/albums/al1/comments",
        json!({ "comment": "x", "star": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Artist comments carry no star
    let (status, _) = comment(
        &app,
        &alice,
        "/artists/a1/comments",
        json!({ "comment": "x", "star": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = comment(
        &app,
        &alice,
        "/artists/a1/comments",
        json!({ "comment": "长".repeat(256) }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = comment(
        &app,
        &alice,
        "/artists/a1/comments",
        json!({ "comment": "长".repeat(255) }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("star").is_none());
}

#[tokio::test]
async fn test_comment_on_missing_target_is_404() {
    let app = seeded_app().await;
    let alice = app.login("alice", ALICE_PASSWORD).await;

    let (status, body) = comment(
        &app,
        &alice,
        "/songs/nope/comments",
        json!({ "comment": "?", "star": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Song not found");

    let (status, _) = app.get("/albums/nope/comments").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comments_listed_newest_first() {
    let app = seeded_app().await;
    let alice = app.login("alice", ALICE_PASSWORD).await;
    let bob = app.login("bob", BOB_PASSWORD).await;

    comment(&app, &alice, "/songs/s2/comments", json!({ "comment": "first", "star": 4 })).await;
    comment(&app, &bob, "/songs/s2/comments", json!({ "comment": "second", "star": 3 })).await;

    let (status, body) = app.get("/songs/s2/comments").await;
    assert_eq!(status, StatusCode::OK);
    let texts: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["comment"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["second", "first"]);

    let (_, body) = app.get("/songs/s2/comments?limit=1").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_only_author_may_delete() {
    let app = seeded_app().await;
    let alice = app.login("alice", ALICE_PASSWORD).await;
    let bob = app.login("bob", BOB_PASSWORD).await;

    let (_, body) = comment(
        &app,
        &alice,
        "/albums/al1/comments",
        json!({ "comment": "好听", "star": 88 }),
    )
    .await;
    let id = body["id"].as_i64().unwrap();
    let uri = format!("/albums/comments/{}", id);

    let (status, _) = app.send(delete(&uri, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.send(delete(&uri, Some(&bob))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, body) = app.send(delete(&uri, Some(&alice))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);

    let (status, _) = app.send(delete(&uri, Some(&alice))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/albums/al1/comments").await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_like_increments_counter() {
    let app = seeded_app().await;
    let alice = app.login("alice", ALICE_PASSWORD).await;
    let bob = app.login("bob", BOB_PASSWORD).await;

    let (_, body) = comment(&app, &alice, "/artists/a2/comments", json!({ "comment": "live!" })).await;
    let uri = format!("/artists/comments/{}/like", body["id"]);

    let (status, _) = app.send(post_empty(&uri, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    app.send(post_empty(&uri, Some(&bob))).await;
    let (status, body) = app.send(post_empty(&uri, Some(&alice))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["num_like"], 2);

    let (status, _) = app
        .send(post_empty("/artists/comments/9999/like", Some(&alice)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_song_and_album_ratings() {
    let app = seeded_app().await;
    let alice = app.login("alice", ALICE_PASSWORD).await;
    let bob = app.login("bob", BOB_PASSWORD).await;

    let (status, body) = app.get("/songs/s1/rating").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert!(body["stars"].is_null());

    comment(&app, &alice, "/songs/s1/comments", json!({ "comment": "a", "star": 5 })).await;
    comment(&app, &bob, "/songs/s1/comments", json!({ "comment": "b", "star": 4 })).await;
    comment(&app, &bob, "/songs/s2/comments", json!({ "comment": "c", "star": 3 })).await;

    let (_, body) = app.get("/songs/s1/rating").await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["average"], 4.5);
    assert_eq!(body["stars"], 4.5);

    let (_, body) = app.get("/albums/al1/songs-rating").await;
    assert_eq!(body["count"], 3);
    assert_eq!(body["average"], 4.0);
    assert_eq!(body["stars"], 4.0);

    comment(&app, &alice, "/albums/al1/comments", json!({ "comment": "a", "star": 90 })).await;
    comment(&app, &bob, "/albums/al1/comments", json!({ "comment": "b", "star": 70 })).await;

    let (status, body) = app.get("/albums/al1/rating").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["average"], 80.0);
    assert_eq!(body["score"], 8.0);
    assert_eq!(body["stars"], 4.0);

    let (status, _) = app.get("/albums/missing/rating").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comments_by_user() {
    let app = seeded_app().await;
    let alice = app.login("alice", ALICE_PASSWORD).await;
    let bob = app.login("bob", BOB_PASSWORD).await;

    comment(&app, &alice, "/songs/s1/comments", json!({ "comment": "a1", "star": 5 })).await;
    comment(&app, &alice, "/songs/s3/comments", json!({ "comment": "a2", "star": 4 })).await;
    comment(&app, &bob, "/songs/s3/comments", json!({ "comment": "b1", "star": 2 })).await;
    comment(&app, &alice, "/artists/a1/comments", json!({ "comment": "a3" })).await;

    let (status, body) = app.get("/users/1/comments/songs").await;
    assert_eq!(status, StatusCode::OK);
    let songs: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["song_id"].as_str().unwrap())
        .collect();
    assert_eq!(songs, vec!["s3", "s1"]);

    let (_, body) = app.get("/users/1/comments/artists").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = app.get("/users/2/comments/albums").await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = app.get("/users/77/comments/songs").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
