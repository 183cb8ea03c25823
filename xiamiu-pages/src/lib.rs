//! xiamiu-pages library - legacy server-rendered site over the Xiamiu catalog
//!
//! Read-only. Every page is assembled from the named queries in
//! [`procedures`].

use axum::Router;
use sqlx::SqlitePool;
use std::time::Instant;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod pages;
pub mod procedures;

pub use error::{PageError, PageResult};

/// Application state shared across page handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Server start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            started_at: Instant::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/", get(pages::home::home_page))
        .route("/artist/:artist_id/", get(pages::artist::artist_page))
        .route("/album/:album_id/", get(pages::album::album_page))
        .route("/song/:song_id/", get(pages::song::song_page))
        .route("/genre/:genre_id/", get(pages::genre::genre_page))
        .route("/search/", get(pages::search::search_page))
        .route("/search/artist/", post(pages::search::search_artist))
        .route("/search/album/", post(pages::search::search_album))
        .route("/search/song/", post(pages::search::search_song))
        .route("/health", get(pages::health::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
