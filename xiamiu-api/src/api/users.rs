//! Public user profile endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use xiamiu_common::db::models::User;
use xiamiu_common::db::users;

use crate::pagination::ListParams;
use crate::{ApiError, ApiResult, AppState};

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<User>>> {
    let page = params.page();
    Ok(Json(users::list_users(&state.db, page.skip, page.limit).await?))
}

/// GET /users/:user_id
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<User>> {
    let user = users::get_user(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User".to_string()))?;
    Ok(Json(user))
}
