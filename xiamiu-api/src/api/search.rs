//! Name search across artists, albums and songs

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::debug;
use xiamiu_common::db::search::{self, SearchResults};

use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default, alias = "q")]
    pub query: String,
}

/// GET /search?query= (or `q=`)
///
/// Case-insensitive substring match on names. `%` and `_` match literally.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResults>> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }

    let results = search::search_all(&state.db, query).await?;
    debug!(
        "Search '{}': {} artists, {} albums, {} songs",
        query,
        results.artists.len(),
        results.albums.len(),
        results.songs.len()
    );
    Ok(Json(results))
}
