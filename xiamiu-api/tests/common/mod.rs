//! Shared helpers for xiamiu-api integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot`
use xiamiu_api::{build_router, AppState};
use xiamiu_common::db::{init_memory_database, settings};
use xiamiu_common::seed::{self, SeedData};

pub const ALICE_PASSWORD: &str = "alice-pass";
pub const BOB_PASSWORD: &str = "bob-pass";

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub token_secret: i64,
}

/// Fresh in-memory database with the router on top (no catalog data)
pub async fn empty_app() -> TestApp {
    let pool = init_memory_database().await.expect("memory database");
    let token_secret = settings::load_token_secret(&pool)
        .await
        .expect("token secret");
    let router = build_router(AppState::new(pool.clone(), token_secret, 30));
    TestApp {
        router,
        pool,
        token_secret,
    }
}

/// In-memory database loaded with a small catalog and two users
///
/// - genre 1 "Pop", genre 2 "Rock"
/// - artist a1 (华语, Pop) and artist a2 (欧美, Rock)
/// - album al1 by a1 (国语, Pop) and album al2 by a2 (英语)
/// - songs s1, s2 on al1 (both credited to a1), s3 on al2 (credited to a2)
/// - users 1 alice and 2 bob
pub async fn seeded_app() -> TestApp {
    let app = empty_app().await;
    let data: SeedData = serde_json::from_value(json!({
        "genres": [
            { "id": 1, "name": "Pop", "info": "Popular music" },
            { "id": 2, "name": "Rock", "info": "" }
        ],
        "artists": [
            { "artist_id": "a1", "name": "周杰伦", "reign": "华语" },
            { "artist_id": "a2", "name": "Coldplay", "reign": "欧美" }
        ],
        "albums": [
            {
                "album_id": "al1", "name": "叶惠美", "artist_id": "a1", "album_lan": "国语",
                "release_date": "2003-07-31", "album_category": "录音室专辑",
                "record_label": "阿尔发音乐", "star": 90, "listen_date": null
            },
            {
                "album_id": "al2", "name": "Parachutes", "artist_id": "a2", "album_lan": "英语",
                "release_date": "2000-07-10", "album_category": "Studio",
                "record_label": "Parlophone", "star": 80, "listen_date": "2020-01-01"
            }
        ],
        "songs": [
            { "song_id": "s1", "name": "晴天", "star": 5, "album_id": "al1" },
            { "song_id": "s2", "name": "东风破", "star": 4, "album_id": "al1" },
            { "song_id": "s3", "name": "Yellow", "star": 5, "album_id": "al2" }
        ],
        "artist_meta": [
            { "artist_id": "a1", "info": "台湾歌手", "pic_address": "http://img/a1.jpg" }
        ],
        "users": [
            { "id": 1, "user_name": "alice", "password": ALICE_PASSWORD, "location": "上海" },
            { "id": 2, "user_name": "bob", "password": BOB_PASSWORD }
        ],
        "artist_genres": [
            { "artist_id": "a1", "genre_id": 1 },
            { "artist_id": "a2", "genre_id": 2 }
        ],
        "album_genres": [
            { "album_id": "al1", "genre_id": 1 }
        ],
        "song_artists": [
            { "song_id": "s1", "artist_id": "a1" },
            { "song_id": "s2", "artist_id": "a1" },
            { "song_id": "s3", "artist_id": "a2" }
        ]
    }))
    .expect("fixture parses");

    seed::import(&app.pool, data).await.expect("fixture imports");
    app
}

impl TestApp {
    /// Send a request and decode the JSON body (`Null` when empty)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(get(uri)).await
    }

    /// Log in through the form endpoint and return the bearer token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self.send(login_form(username, password)).await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["access_token"].as_str().unwrap().to_string()
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn post_empty(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("DELETE").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn login_form(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!(
            "username={}&password={}",
            username, password
        )))
        .unwrap()
}
