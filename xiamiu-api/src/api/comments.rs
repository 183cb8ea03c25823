//! Comment endpoints for songs, albums and artists
//!
//! The author of a new comment is always the token holder. Deleting is
//! restricted to the author; anyone signed in may like a comment.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use tracing::info;
use xiamiu_common::db::comments::{self, CommentRow};
use xiamiu_common::db::models::{AlbumComment, ArtistComment, CommentCreate, SongComment};
use xiamiu_common::db::users;

use crate::api::AuthUser;
use crate::pagination::ListParams;
use crate::{ApiError, ApiResult, AppState};

async fn create<T: CommentRow>(
    state: &AppState,
    auth: &AuthUser,
    target_id: &str,
    payload: &CommentCreate,
) -> ApiResult<T> {
    let comment = comments::create_comment::<T>(&state.db, target_id, auth.id, payload).await?;
    info!(
        "User {} commented on {} {} (comment {})",
        auth.id,
        T::KIND,
        target_id,
        comment.id()
    );
    Ok(comment)
}

async fn list_for_target<T: CommentRow>(
    state: &AppState,
    target_id: &str,
    params: ListParams,
) -> ApiResult<Vec<T>> {
    if !comments::target_exists(&state.db, T::KIND, target_id).await? {
        return Err(ApiError::NotFound(T::KIND.entity_name().to_string()));
    }
    let page = params.page();
    Ok(comments::list_comments_for_target::<T>(&state.db, target_id, page.skip, page.limit).await?)
}

async fn list_for_user<T: CommentRow>(
    state: &AppState,
    user_id: i64,
    params: ListParams,
) -> ApiResult<Vec<T>> {
    if users::get_user(&state.db, user_id).await?.is_none() {
        return Err(ApiError::NotFound("User".to_string()));
    }
    let page = params.page();
    Ok(comments::list_comments_by_user::<T>(&state.db, user_id, page.skip, page.limit).await?)
}

async fn delete<T: CommentRow>(state: &AppState, auth: &AuthUser, comment_id: i64) -> ApiResult<T> {
    let comment = comments::delete_comment::<T>(&state.db, comment_id, auth.id).await?;
    info!("User {} deleted {} comment {}", auth.id, T::KIND, comment_id);
    Ok(comment)
}

// ========================================
// Song comments
// ========================================

/// POST /songs/:song_id/comments
pub async fn create_song_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(song_id): Path<String>,
    Json(payload): Json<CommentCreate>,
) -> ApiResult<Json<SongComment>> {
    Ok(Json(create(&state, &auth, &song_id, &payload).await?))
}

/// GET /songs/:song_id/comments
pub async fn list_song_comments(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<SongComment>>> {
    Ok(Json(list_for_target(&state, &song_id, params).await?))
}

/// DELETE /songs/comments/:comment_id
pub async fn delete_song_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(comment_id): Path<i64>,
) -> ApiResult<Json<SongComment>> {
    Ok(Json(delete(&state, &auth, comment_id).await?))
}

/// POST /songs/comments/:comment_id/like
pub async fn like_song_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
) -> ApiResult<Json<SongComment>> {
    Ok(Json(comments::like_comment::<SongComment>(&state.db, comment_id).await?))
}

// ========================================
// Album comments
// ========================================

/// POST /albums/:album_id/comments
pub async fn create_album_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(album_id): Path<String>,
    Json(payload): Json<CommentCreate>,
) -> ApiResult<Json<AlbumComment>> {
    Ok(Json(create(&state, &auth, &album_id, &payload).await?))
}

/// GET /albums/:album_id/comments
pub async fn list_album_comments(
    State(state): State<AppState>,
    Path(album_id): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<AlbumComment>>> {
    Ok(Json(list_for_target(&state, &album_id, params).await?))
}

/// DELETE /albums/comments/:comment_id
pub async fn delete_album_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(comment_id): Path<i64>,
) -> ApiResult<Json<AlbumComment>> {
    Ok(Json(delete(&state, &auth, comment_id).await?))
}

/// POST /albums/comments/:comment_id/like
pub async fn like_album_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
) -> ApiResult<Json<AlbumComment>> {
    Ok(Json(comments::like_comment::<AlbumComment>(&state.db, comment_id).await?))
}

// ========================================
// Artist comments
// ========================================

/// POST /artists/:artist_id/comments
pub async fn create_artist_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(artist_id): Path<String>,
    Json(payload): Json<CommentCreate>,
) -> ApiResult<Json<ArtistComment>> {
    Ok(Json(create(&state, &auth, &artist_id, &payload).await?))
}

/// GET /artists/:artist_id/comments
pub async fn list_artist_comments(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<ArtistComment>>> {
    Ok(Json(list_for_target(&state, &artist_id, params).await?))
}

/// DELETE /artists/comments/:comment_id
pub async fn delete_artist_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(comment_id): Path<i64>,
) -> ApiResult<Json<ArtistComment>> {
    Ok(Json(delete(&state, &auth, comment_id).await?))
}

/// POST /artists/comments/:comment_id/like
pub async fn like_artist_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
) -> ApiResult<Json<ArtistComment>> {
    Ok(Json(comments::like_comment::<ArtistComment>(&state.db, comment_id).await?))
}

// ========================================
// Per-user listings
// ========================================

/// GET /users/:user_id/comments/songs
pub async fn list_user_song_comments(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<SongComment>>> {
    Ok(Json(list_for_user(&state, user_id, params).await?))
}

/// GET /users/:user_id/comments/albums
pub async fn list_user_album_comments(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<AlbumComment>>> {
    Ok(Json(list_for_user(&state, user_id, params).await?))
}

/// GET /users/:user_id/comments/artists
pub async fn list_user_artist_comments(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<ArtistComment>>> {
    Ok(Json(list_for_user(&state, user_id, params).await?))
}
