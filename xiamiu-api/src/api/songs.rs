//! Song endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;
use xiamiu_common::db::models::{Artist, Song, SongCreate, SongMeta, SongMetaCreate};
use xiamiu_common::db::{meta, ratings, songs};
use xiamiu_common::rating::SongRating;

use crate::api::validate::{in_range, path_key, required, SONG_ROUTE_SEGMENTS};
use crate::pagination::ListParams;
use crate::{ApiError, ApiResult, AppState};

async fn require_song(state: &AppState, song_id: &str) -> ApiResult<Song> {
    songs::get_song(&state.db, song_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Song".to_string()))
}

/// POST /songs
pub async fn create_song(
    State(state): State<AppState>,
    Json(song): Json<SongCreate>,
) -> ApiResult<Json<Song>> {
    path_key("song_id", &song.song_id, 20, SONG_ROUTE_SEGMENTS)?;
    required("name", &song.name, 255)?;
    required("album_id", &song.album_id, 20)?;
    in_range("star", song.star, 1..=5)?;

    let created = songs::create_song(&state.db, &song).await?;
    info!("Created song {} on album {}", created.song_id, created.album_id);
    Ok(Json(created))
}

/// GET /songs
pub async fn list_songs(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Song>>> {
    let page = params.page();
    Ok(Json(songs::list_songs(&state.db, page.skip, page.limit).await?))
}

/// GET /songs/:song_id
pub async fn get_song(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
) -> ApiResult<Json<Song>> {
    Ok(Json(require_song(&state, &song_id).await?))
}

/// GET /songs/:song_id/artists
pub async fn list_song_artists(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
) -> ApiResult<Json<Vec<Artist>>> {
    require_song(&state, &song_id).await?;
    Ok(Json(songs::list_song_artists(&state.db, &song_id).await?))
}

/// GET /songs/:song_id/meta
pub async fn get_song_meta(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
) -> ApiResult<Json<SongMeta>> {
    let meta = meta::get_song_meta(&state.db, &song_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Song meta".to_string()))?;
    Ok(Json(meta))
}

/// POST /songs/:song_id/meta
pub async fn create_song_meta(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
    Json(payload): Json<SongMetaCreate>,
) -> ApiResult<Json<SongMeta>> {
    let created = meta::create_song_meta(&state.db, &song_id, &payload).await?;
    info!("Created lyrics for song {}", song_id);
    Ok(Json(created))
}

/// GET /songs/:song_id/rating
pub async fn get_song_rating(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
) -> ApiResult<Json<SongRating>> {
    require_song(&state, &song_id).await?;
    Ok(Json(ratings::get_song_rating(&state.db, &song_id).await?))
}
