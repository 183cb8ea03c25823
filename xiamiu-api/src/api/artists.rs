//! Artist endpoints, including artist meta

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;
use xiamiu_common::db::models::{
    Album, Artist, ArtistCreate, ArtistMeta, Genre, InfoMetaCreate, Song,
};
use xiamiu_common::db::{artists, meta};

use crate::api::validate::{max_len, path_key, required, ARTIST_ROUTE_SEGMENTS};
use crate::pagination::ListParams;
use crate::{ApiError, ApiResult, AppState};

async fn require_artist(state: &AppState, artist_id: &str) -> ApiResult<Artist> {
    artists::get_artist(&state.db, artist_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Artist".to_string()))
}

/// POST /artists
///
/// Every id in `genre_ids` must name an existing genre.
pub async fn create_artist(
    State(state): State<AppState>,
    Json(artist): Json<ArtistCreate>,
) -> ApiResult<Json<Artist>> {
    path_key("artist_id", &artist.artist_id, 20, ARTIST_ROUTE_SEGMENTS)?;
    required("name", &artist.name, 50)?;
    max_len("reign", &artist.reign, 50)?;

    let created = artists::create_artist(&state.db, &artist).await?;
    info!(
        "Created artist {} with {} genre(s)",
        created.artist_id,
        artist.genre_ids.len()
    );
    Ok(Json(created))
}

/// GET /artists
pub async fn list_artists(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Artist>>> {
    let page = params.page();
    Ok(Json(artists::list_artists(&state.db, page.skip, page.limit).await?))
}

/// GET /artists/reign/:reign and /artists/region/:reign
pub async fn list_artists_by_reign(
    State(state): State<AppState>,
    Path(reign): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Artist>>> {
    let page = params.page();
    Ok(Json(
        artists::list_artists_by_reign(&state.db, &reign, page.skip, page.limit).await?,
    ))
}

/// GET /artists/:artist_id
pub async fn get_artist(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
) -> ApiResult<Json<Artist>> {
    Ok(Json(require_artist(&state, &artist_id).await?))
}

/// GET /artists/:artist_id/albums
pub async fn list_artist_albums(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Album>>> {
    require_artist(&state, &artist_id).await?;
    let page = params.page();
    Ok(Json(
        artists::list_artist_albums(&state.db, &artist_id, page.skip, page.limit).await?,
    ))
}

/// GET /artists/:artist_id/songs
pub async fn list_artist_songs(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Song>>> {
    require_artist(&state, &artist_id).await?;
    let page = params.page();
    Ok(Json(
        artists::list_artist_songs(&state.db, &artist_id, page.skip, page.limit).await?,
    ))
}

/// GET /artists/:artist_id/genres
pub async fn list_artist_genres(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
) -> ApiResult<Json<Vec<Genre>>> {
    require_artist(&state, &artist_id).await?;
    Ok(Json(artists::list_artist_genres(&state.db, &artist_id).await?))
}

/// GET /artists/:artist_id/meta
pub async fn get_artist_meta(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
) -> ApiResult<Json<ArtistMeta>> {
    let meta = meta::get_artist_meta(&state.db, &artist_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Artist meta".to_string()))?;
    Ok(Json(meta))
}

/// POST /artists/:artist_id/meta
pub async fn create_artist_meta(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
    Json(payload): Json<InfoMetaCreate>,
) -> ApiResult<Json<ArtistMeta>> {
    max_len("pic_address", &payload.pic_address, 255)?;

    let created = meta::create_artist_meta(&state.db, &artist_id, &payload).await?;
    info!("Created meta for artist {}", artist_id);
    Ok(Json(created))
}
