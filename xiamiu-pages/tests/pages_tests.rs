//! Integration tests for the server-rendered pages
//!
//! Each test builds the router over an in-memory catalog and drives it
//! with `oneshot`.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`
use xiamiu_common::db::init_memory_database;
use xiamiu_common::seed::{self, SeedData};
use xiamiu_pages::{build_router, AppState};

/// Catalog used by every test
///
/// - genres 1 Pop, 2 Rock
/// - artists a1 周杰伦 (Pop, with picture) and a2 "<Tag> & Co" (no meta)
/// - album al1 by a1 with cover and two songs, album al2 by a2 with one song
/// - s1 has lyrics and two comments (the second is more liked)
async fn setup_app() -> Router {
    let pool = init_memory_database().await.expect("memory database");
    let data: SeedData = serde_json::from_value(json!({
        "genres": [
            { "id": 1, "name": "Pop", "info": "Popular music" },
            { "id": 2, "name": "Rock", "info": "" }
        ],
        "artists": [
            { "artist_id": "a1", "name": "周杰伦", "reign": "华语" },
            { "artist_id": "a2", "name": "<Tag> & Co", "reign": "欧美" }
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
        "song_meta": [
            { "song_id": "s1", "lyrics": "故事的小黄花\n从出生那年就飘着" }
        ],
        "artist_meta": [
            { "artist_id": "a1", "info": "台湾歌手", "pic_address": "http://img/a1.jpg" }
        ],
        "album_meta": [
            { "album_id": "al1", "info": "第四张专辑", "pic_address": "http://img/al1.jpg" }
        ],
        "users": [
            { "id": 1, "user_name": "alice", "password": "alice-pass" },
            { "id": 2, "user_name": "bob", "password": "bob-pass" }
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
        ],
        "song_comments": [
            {
                "id": 1, "song_id": "s1", "user_id": 1, "comment": "好听", "star": 5,
                "num_like": 1, "review_date": "2024-01-01",
                "created": "2024-01-01T10:00:00", "modified": "2024-01-01T10:00:00"
            },
            {
                "id": 2, "song_id": "s1", "user_id": 2, "comment": "青春的回忆", "star": 4,
                "num_like": 7, "review_date": "2024-01-02",
                "created": "2024-01-02T10:00:00", "modified": "2024-01-02T10:00:00"
            }
        ]
    }))
    .expect("fixture parses");

    seed::import(&pool, data).await.expect("fixture imports");
    build_router(AppState::new(pool))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).expect("UTF-8 body"))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn post_form(app: &Router, uri: &str, body: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

// ============================================================================
// Home and health
// ============================================================================

#[tokio::test]
async fn test_home_lists_genres() {
    let app = setup_app().await;
    let (status, html) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<title>"));
    assert!(html.contains(r#"<a href="/genre/1/">Pop</a>"#));
    assert!(html.contains(r#"<a href="/genre/2/">Rock</a>"#));
    assert!(html.contains(r#"href="/search/""#));
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app().await;
    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "xiamiu-pages");
}

// ============================================================================
// Artist page
// ============================================================================

#[tokio::test]
async fn test_artist_page() {
    let app = setup_app().await;
    let (status, html) = get(&app, "/artist/a1/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<h1>周杰伦</h1>"));
    assert!(html.contains("华语"));
    assert!(html.contains(r#"<a href="/genre/1/">Pop</a>"#));
    assert!(html.contains("台湾歌手"));
    assert!(html.contains(r#"src="http://img/a1.jpg""#));
    assert!(html.contains(r#"<a href="/album/al1/">叶惠美</a>"#));
    // No artist comments in the fixture
    assert!(html.contains("暂无评论"));
}

#[tokio::test]
async fn test_artist_page_escapes_names() {
    let app = setup_app().await;
    let (status, html) = get(&app, "/artist/a2/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<h1>&lt;Tag&gt; &amp; Co</h1>"));
    assert!(!html.contains("<Tag>"));
    assert!(html.contains(r#"class="cover placeholder""#));
}

#[tokio::test]
async fn test_artist_page_not_found() {
    let app = setup_app().await;
    let (status, html) = get(&app, "/artist/nobody/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Artist not found."));
}

// ============================================================================
// Album page
// ============================================================================

#[tokio::test]
async fn test_album_page() {
    let app = setup_app().await;
    let (status, html) = get(&app, "/album/al1/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<h1>叶惠美</h1>"));
    assert!(html.contains(r#"<a href="/artist/a1/">周杰伦</a>"#));
    assert!(html.contains("阿尔发音乐"));
    assert!(html.contains("2003-07-31"));
    assert!(html.contains("第四张专辑"));
    assert!(html.contains(r#"src="http://img/al1.jpg""#));
    assert!(html.contains(r#"<a href="/song/s1/">晴天</a>"#));
    assert!(html.contains(r#"<a href="/song/s2/">东风破</a>"#));
    // listen_date is null
    assert!(html.contains("收听时间: -"));
}

#[tokio::test]
async fn test_album_page_not_found() {
    let app = setup_app().await;
    let (status, html) = get(&app, "/album/missing/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Album not found."));
}

// ============================================================================
// Song page
// ============================================================================

#[tokio::test]
async fn test_song_page_shows_lyrics_and_hot_comment() {
    let app = setup_app().await;
    let (status, html) = get(&app, "/song/s1/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<h1>晴天</h1>"));
    assert!(html.contains(r#"<a href="/artist/a1/">周杰伦</a>"#));
    assert!(html.contains(r#"<a href="/album/al1/">叶惠美</a>"#));
    assert!(html.contains("故事的小黄花"));
    // Song picture is the album cover
    assert!(html.contains(r#"src="http://img/al1.jpg""#));
    // Most-liked comment wins
    assert!(html.contains("青春的回忆"));
    assert!(!html.contains("好听"));
}

#[tokio::test]
async fn test_song_page_without_lyrics() {
    let app = setup_app().await;
    let (status, html) = get(&app, "/song/s3/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<h1>Yellow</h1>"));
    assert!(html.contains("暂无歌词"));
    assert!(html.contains("暂无评论"));
    assert!(html.contains("&lt;Tag&gt; &amp; Co"));
}

#[tokio::test]
async fn test_song_page_not_found() {
    let app = setup_app().await;
    let (status, html) = get(&app, "/song/zzz/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Song not found."));
}

// ============================================================================
// Genre page
// ============================================================================

#[tokio::test]
async fn test_genre_page() {
    let app = setup_app().await;
    let (status, html) = get(&app, "/genre/1/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<h1>Pop</h1>"));
    assert!(html.contains("Popular music"));
    assert!(html.contains(r#"<a href="/artist/a1/">周杰伦</a>"#));
    assert!(!html.contains("/artist/a2/"));
}

#[tokio::test]
async fn test_genre_page_unknown_or_non_numeric() {
    let app = setup_app().await;

    let (status, html) = get(&app, "/genre/99/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Genre not found."));

    let (status, _) = get(&app, "/genre/pop/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_form() {
    let app = setup_app().await;
    let (status, html) = get(&app, "/search/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"name="artistQuery""#));
    assert!(html.contains(r#"name="albumQuery""#));
    assert!(html.contains(r#"name="songQuery""#));
    assert!(!html.contains("搜索结果"));
}

#[tokio::test]
async fn test_search_artist_hits() {
    let app = setup_app().await;
    // "周" percent-encoded
    let (status, html) = post_form(&app, "/search/artist/", "artistQuery=%E5%91%A8").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("搜索结果"));
    assert!(html.contains(r#"class="artist-results""#));
    assert!(html.contains(r#"<a href="/artist/a1/">周杰伦</a>"#));
    assert!(html.contains(r#"src="http://img/a1.jpg""#));
}

#[tokio::test]
async fn test_search_artist_no_hits_renders_form() {
    let app = setup_app().await;

    let (status, html) = post_form(&app, "/search/artist/", "artistQuery=nomatch").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"name="artistQuery""#));
    assert!(!html.contains("搜索结果"));

    let (status, html) = post_form(&app, "/search/artist/", "artistQuery=+++").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains("搜索结果"));
}

#[tokio::test]
async fn test_search_album_hits() {
    let app = setup_app().await;
    let (status, html) = post_form(&app, "/search/album/", "albumQuery=para").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"class="album-results""#));
    assert!(html.contains(r#"<a href="/album/al2/">Parachutes</a>"#));
    assert!(html.contains("&lt;Tag&gt; &amp; Co"));
    assert!(!html.contains("/album/al1/"));
}

#[tokio::test]
async fn test_search_song_hits() {
    let app = setup_app().await;
    let (status, html) = post_form(&app, "/search/song/", "songQuery=yell").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"class="song-results""#));
    assert!(html.contains(r#"<a href="/song/s3/">Yellow</a>"#));
    assert!(html.contains(r#"<a href="/album/al2/">Parachutes</a>"#));
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let app = setup_app().await;
    // "%" percent-encoded
    let (status, html) = post_form(&app, "/search/song/", "songQuery=%25").await;

    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains("搜索结果"));
}
