//! Genre endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;
use xiamiu_common::db::genres;
use xiamiu_common::db::models::{Album, Artist, Genre, GenreCreate};

use crate::api::validate::required;
use crate::pagination::ListParams;
use crate::{ApiError, ApiResult, AppState};

async fn require_genre(state: &AppState, genre_id: i64) -> ApiResult<Genre> {
    genres::get_genre(&state.db, genre_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Genre".to_string()))
}

/// POST /genres
pub async fn create_genre(
    State(state): State<AppState>,
    Json(genre): Json<GenreCreate>,
) -> ApiResult<Json<Genre>> {
    required("name", &genre.name, 50)?;

    let created = genres::create_genre(&state.db, &genre).await?;
    info!("Created genre {} ({})", created.id, created.name);
    Ok(Json(created))
}

/// GET /genres
pub async fn list_genres(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Genre>>> {
    let page = params.page();
    Ok(Json(genres::list_genres(&state.db, page.skip, page.limit).await?))
}

/// GET /genres/:genre_id
pub async fn get_genre(
    State(state): State<AppState>,
    Path(genre_id): Path<i64>,
) -> ApiResult<Json<Genre>> {
    Ok(Json(require_genre(&state, genre_id).await?))
}

/// GET /genres/:genre_id/artists
pub async fn list_genre_artists(
    State(state): State<AppState>,
    Path(genre_id): Path<i64>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Artist>>> {
    require_genre(&state, genre_id).await?;
    let page = params.page();
    Ok(Json(
        genres::list_genre_artists(&state.db, genre_id, page.skip, page.limit).await?,
    ))
}

/// GET /genres/:genre_id/albums
pub async fn list_genre_albums(
    State(state): State<AppState>,
    Path(genre_id): Path<i64>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Album>>> {
    require_genre(&state, genre_id).await?;
    let page = params.page();
    Ok(Json(
        genres::list_genre_albums(&state.db, genre_id, page.skip, page.limit).await?,
    ))
}
