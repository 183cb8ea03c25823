//! Album endpoints, including album meta and rating aggregates

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;
use xiamiu_common::db::models::{Album, AlbumCreate, AlbumMeta, Genre, InfoMetaCreate, Song};
use xiamiu_common::db::{albums, meta, ratings};
use xiamiu_common::rating::{AlbumRating, SongRating};

use crate::api::validate::{in_range, max_len, path_key, required, ALBUM_ROUTE_SEGMENTS};
use crate::pagination::ListParams;
use crate::{ApiError, ApiResult, AppState};

async fn require_album(state: &AppState, album_id: &str) -> ApiResult<Album> {
    albums::get_album(&state.db, album_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Album".to_string()))
}

/// POST /albums
///
/// `star` is the editorial score on a 1-100 scale.
pub async fn create_album(
    State(state): State<AppState>,
    Json(album): Json<AlbumCreate>,
) -> ApiResult<Json<Album>> {
    path_key("album_id", &album.album_id, 20, ALBUM_ROUTE_SEGMENTS)?;
    required("name", &album.name, 255)?;
    required("artist_id", &album.artist_id, 20)?;
    max_len("album_lan", &album.album_lan, 10)?;
    max_len("album_category", &album.album_category, 20)?;
    max_len("record_label", &album.record_label, 50)?;
    in_range("star", album.star, 1..=100)?;

    let created = albums::create_album(&state.db, &album).await?;
    info!("Created album {} by {}", created.album_id, created.artist_id);
    Ok(Json(created))
}

/// GET /albums
pub async fn list_albums(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Album>>> {
    let page = params.page();
    Ok(Json(albums::list_albums(&state.db, page.skip, page.limit).await?))
}

/// GET /albums/language/:language
pub async fn list_albums_by_language(
    State(state): State<AppState>,
    Path(language): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Album>>> {
    let page = params.page();
    Ok(Json(
        albums::list_albums_by_language(&state.db, &language, page.skip, page.limit).await?,
    ))
}

/// GET /albums/:album_id
pub async fn get_album(
    State(state): State<AppState>,
    Path(album_id): Path<String>,
) -> ApiResult<Json<Album>> {
    Ok(Json(require_album(&state, &album_id).await?))
}

/// GET /albums/:album_id/songs
pub async fn list_album_songs(
    State(state): State<AppState>,
    Path(album_id): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Song>>> {
    require_album(&state, &album_id).await?;
    let page = params.page();
    Ok(Json(
        albums::list_album_songs(&state.db, &album_id, page.skip, page.limit).await?,
    ))
}

/// GET /albums/:album_id/genres
pub async fn list_album_genres(
    State(state): State<AppState>,
    Path(album_id): Path<String>,
) -> ApiResult<Json<Vec<Genre>>> {
    require_album(&state, &album_id).await?;
    Ok(Json(albums::list_album_genres(&state.db, &album_id).await?))
}

/// GET /albums/:album_id/meta
pub async fn get_album_meta(
    State(state): State<AppState>,
    Path(album_id): Path<String>,
) -> ApiResult<Json<AlbumMeta>> {
    let meta = meta::get_album_meta(&state.db, &album_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Album meta".to_string()))?;
    Ok(Json(meta))
}

/// POST /albums/:album_id/meta
pub async fn create_album_meta(
    State(state): State<AppState>,
    Path(album_id): Path<String>,
    Json(payload): Json<InfoMetaCreate>,
) -> ApiResult<Json<AlbumMeta>> {
    max_len("pic_address", &payload.pic_address, 255)?;

    let created = meta::create_album_meta(&state.db, &album_id, &payload).await?;
    info!("Created meta for album {}", album_id);
    Ok(Json(created))
}

/// GET /albums/:album_id/rating
///
/// Mean of album comment stars (1-100), shown as a 0-10 score and 1-5 stars.
pub async fn get_album_rating(
    State(state): State<AppState>,
    Path(album_id): Path<String>,
) -> ApiResult<Json<AlbumRating>> {
    require_album(&state, &album_id).await?;
    Ok(Json(ratings::get_album_rating(&state.db, &album_id).await?))
}

/// GET /albums/:album_id/songs-rating
///
/// Mean of song comment stars across every song on the album.
pub async fn get_album_songs_rating(
    State(state): State<AppState>,
    Path(album_id): Path<String>,
) -> ApiResult<Json<SongRating>> {
    require_album(&state, &album_id).await?;
    Ok(Json(ratings::get_album_songs_rating(&state.db, &album_id).await?))
}
