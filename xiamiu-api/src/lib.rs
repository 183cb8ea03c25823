//! xiamiu-api library - REST API over the Xiamiu music catalog
//!
//! Reads are public. Every mutation except registration and login sits
//! behind the bearer-token middleware.

use axum::Router;
use sqlx::SqlitePool;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod pagination;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Bearer token signing secret (from the settings table)
    pub token_secret: i64,
    /// Lifetime of issued tokens
    pub token_ttl_minutes: i64,
    /// Server start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, token_secret: i64, token_ttl_minutes: i64) -> Self {
        Self {
            db,
            token_secret,
            token_ttl_minutes,
            started_at: Instant::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{delete, get, post};

    // Protected routes (require a bearer token)
    let protected = Router::new()
        .route("/users/me", get(api::auth::read_users_me))
        .route("/genres", post(api::genres::create_genre))
        .route("/genres/", post(api::genres::create_genre))
        .route("/artists", post(api::artists::create_artist))
        .route("/artists/", post(api::artists::create_artist))
        .route("/artists/:artist_id/meta", post(api::artists::create_artist_meta))
        .route("/artists/:artist_id/comments", post(api::comments::create_artist_comment))
        .route("/artists/comments/:comment_id", delete(api::comments::delete_artist_comment))
        .route("/artists/comments/:comment_id/like", post(api::comments::like_artist_comment))
        .route("/albums", post(api::albums::create_album))
        .route("/albums/", post(api::albums::create_album))
        .route("/albums/:album_id/meta", post(api::albums::create_album_meta))
        .route("/albums/:album_id/comments", post(api::comments::create_album_comment))
        .route("/albums/comments/:comment_id", delete(api::comments::delete_album_comment))
        .route("/albums/comments/:comment_id/like", post(api::comments::like_album_comment))
        .route("/songs", post(api::songs::create_song))
        .route("/songs/", post(api::songs::create_song))
        .route("/songs/:song_id/meta", post(api::songs::create_song_meta))
        .route("/songs/:song_id/comments", post(api::comments::create_song_comment))
        .route("/songs/comments/:comment_id", delete(api::comments::delete_song_comment))
        .route("/songs/comments/:comment_id/like", post(api::comments::like_song_comment))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/", get(api::root))
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/token", post(api::auth::login_for_access_token))
        .route("/login", post(api::auth::login_json))
        .route("/search", get(api::search::search))
        .route("/search/", get(api::search::search))
        // Genres
        .route("/genres", get(api::genres::list_genres))
        .route("/genres/", get(api::genres::list_genres))
        .route("/genres/:genre_id", get(api::genres::get_genre))
        .route("/genres/:genre_id/artists", get(api::genres::list_genre_artists))
        .route("/genres/:genre_id/albums", get(api::genres::list_genre_albums))
        // Artists
        .route("/artists", get(api::artists::list_artists))
        .route("/artists/", get(api::artists::list_artists))
        .route("/artists/reign/:reign", get(api::artists::list_artists_by_reign))
        .route("/artists/region/:reign", get(api::artists::list_artists_by_reign))
        .route("/artists/:artist_id", get(api::artists::get_artist))
        .route("/artists/:artist_id/albums", get(api::artists::list_artist_albums))
        .route("/artists/:artist_id/songs", get(api::artists::list_artist_songs))
        .route("/artists/:artist_id/genres", get(api::artists::list_artist_genres))
        .route("/artists/:artist_id/meta", get(api::artists::get_artist_meta))
        .route("/artists/:artist_id/comments", get(api::comments::list_artist_comments))
        // Albums
        .route("/albums", get(api::albums::list_albums))
        .route("/albums/", get(api::albums::list_albums))
        .route("/albums/language/:language", get(api::albums::list_albums_by_language))
        .route("/albums/:album_id", get(api::albums::get_album))
        .route("/albums/:album_id/songs", get(api::albums::list_album_songs))
        .route("/albums/:album_id/genres", get(api::albums::list_album_genres))
        .route("/albums/:album_id/meta", get(api::albums::get_album_meta))
        .route("/albums/:album_id/comments", get(api::comments::list_album_comments))
        .route("/albums/:album_id/rating", get(api::albums::get_album_rating))
        .route("/albums/:album_id/songs-rating", get(api::albums::get_album_songs_rating))
        // Songs
        .route("/songs", get(api::songs::list_songs))
        .route("/songs/", get(api::songs::list_songs))
        .route("/songs/:song_id", get(api::songs::get_song))
        .route("/songs/:song_id/artists", get(api::songs::list_song_artists))
        .route("/songs/:song_id/meta", get(api::songs::get_song_meta))
        .route("/songs/:song_id/comments", get(api::comments::list_song_comments))
        .route("/songs/:song_id/rating", get(api::songs::get_song_rating))
        // Users
        .route("/users", get(api::users::list_users).post(api::auth::register_user))
        .route("/users/", get(api::users::list_users).post(api::auth::register_user))
        .route("/users/:user_id", get(api::users::get_user))
        .route("/users/:user_id/comments/songs", get(api::comments::list_user_song_comments))
        .route("/users/:user_id/comments/albums", get(api::comments::list_user_album_comments))
        .route("/users/:user_id/comments/artists", get(api::comments::list_user_artist_comments))
        .merge(api::health_routes());

    // Combine routers
    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
