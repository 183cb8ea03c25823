//! Integration tests for registration, login and bearer-token checks

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{empty_app, login_form, post_json, seeded_app, ALICE_PASSWORD};
use serde_json::json;
use xiamiu_common::auth::issue_token;

fn get_with_token(uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_register_then_login() {
    let app = empty_app().await;

    let (status, body) = app
        .send(post_json(
            "/users",
            &json!({
                "user_name": "carol",
                "password": "hunter2",
                "location": "北京",
                "age": 27,
                "constellation": "狮子座"
            }),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_name"], "carol");
    assert_eq!(body["play_count"], 0);
    assert!(body["join_time"].is_string());
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let token = app.login("carol", "hunter2").await;

    let (status, body) = app
        .send(get_with_token("/users/me", &format!("Bearer {}", token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_name"], "carol");
    assert_eq!(body["location"], "北京");
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_bad_fields() {
    let app = seeded_app().await;

    let (status, body) = app
        .send(post_json(
            "/users/",
            &json!({ "user_name": "alice", "password": "other" }),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Username already registered");

    let (status, _) = app
        .send(post_json(
            "/users",
            &json!({ "user_name": "dave", "password": "" }),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(post_json(
            "/users",
            &json!({ "user_name": "dave", "password": "pw", "age": -1 }),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(post_json(
            "/users",
            &json!({ "user_name": "d".repeat(51), "password": "pw" }),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_form_and_json() {
    let app = seeded_app().await;

    let (status, body) = app.send(login_form("alice", ALICE_PASSWORD)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    assert!(body["access_token"].as_str().unwrap().contains('.'));

    let (status, body) = app
        .send(post_json(
            "/login",
            &json!({ "username": "alice", "password": ALICE_PASSWORD }),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
}

#[tokio::test]
async fn test_login_failures_are_401() {
    let app = seeded_app().await;

    let (status, body) = app.send(login_form("alice", "wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Incorrect username or password");

    // Unknown users get the same answer as a wrong password
    let (status, body) = app.send(login_form("mallory", "whatever")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Incorrect username or password");
}

#[tokio::test]
async fn test_me_requires_valid_token() {
    let app = seeded_app().await;

    let (status, _) = app.get("/users/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send(get_with_token("/users/me", "Basic abc")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(get_with_token("/users/me", "Bearer not-a-token"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = app.login("alice", ALICE_PASSWORD).await;
    let (status, body) = app
        .send(get_with_token("/users/me", &format!("bearer {}", token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
}

#[tokio::test]
async fn test_expired_and_foreign_tokens_rejected() {
    let app = seeded_app().await;

    let expired = issue_token(1, "alice", -5, app.token_secret).unwrap();
    let (status, body) = app
        .send(get_with_token("/users/me", &format!("Bearer {}", expired)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let foreign = issue_token(1, "alice", 30, app.token_secret.wrapping_add(1)).unwrap();
    let (status, _) = app
        .send(get_with_token("/users/me", &format!("Bearer {}", foreign)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_unknown_user_rejected() {
    let app = seeded_app().await;

    let token = issue_token(404, "ghost", 30, app.token_secret).unwrap();
    let (status, _) = app
        .send(get_with_token("/users/me", &format!("Bearer {}", token)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
