//! Bearer authentication: token issue, middleware and registration
//!
//! `POST /token` (form) and `POST /login` (JSON) exchange a user name and
//! password for a signed token. The middleware guards every mutating
//! route and hands the resolved user to handlers as an [`AuthUser`]
//! request extension.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension, Form, Json,
};
use serde::Deserialize;
use tracing::{debug, info, warn};
use xiamiu_common::auth::{issue_token, parse_bearer, verify_password, verify_token, AccessToken};
use xiamiu_common::db::models::{User, UserCreate};
use xiamiu_common::db::users;

use crate::api::validate::{max_len, required};
use crate::{ApiError, ApiResult, AppState};

/// The authenticated caller, inserted by [`auth_middleware`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub user_name: String,
}

/// User name and password, as form fields or JSON
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Authentication middleware
///
/// Rejects the request with 401 unless it carries a valid, unexpired
/// bearer token for a user that still exists.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    let token = parse_bearer(header_value)
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    let claims = verify_token(token, state.token_secret).map_err(|e| {
        debug!("Token rejected: {}", e);
        ApiError::Unauthorized("Could not validate credentials".to_string())
    })?;

    let user = users::get_user(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Could not validate credentials".to_string()))?;

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        user_name: user.user_name,
    });

    Ok(next.run(request).await)
}

async fn authenticate(state: &AppState, credentials: &Credentials) -> ApiResult<AccessToken> {
    let record = users::get_user_record_by_name(&state.db, &credentials.username).await?;

    let record = match record {
        Some(record)
            if verify_password(
                &credentials.password,
                &record.password_salt,
                &record.password_hash,
            ) =>
        {
            record
        }
        _ => {
            warn!("Failed login for '{}'", credentials.username);
            return Err(ApiError::Unauthorized(
                "Incorrect username or password".to_string(),
            ));
        }
    };

    let token = issue_token(
        record.id,
        &record.user_name,
        state.token_ttl_minutes,
        state.token_secret,
    )?;

    info!("Issued token for user {}", record.id);
    Ok(AccessToken::bearer(token))
}

/// POST /token
///
/// Form-encoded `username` and `password`.
pub async fn login_for_access_token(
    State(state): State<AppState>,
    Form(credentials): Form<Credentials>,
) -> ApiResult<Json<AccessToken>> {
    Ok(Json(authenticate(&state, &credentials).await?))
}

/// POST /login
///
/// Same as `/token` with a JSON body.
pub async fn login_json(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<Json<AccessToken>> {
    Ok(Json(authenticate(&state, &credentials).await?))
}

/// POST /users (public registration)
pub async fn register_user(
    State(state): State<AppState>,
    Json(user): Json<UserCreate>,
) -> ApiResult<Json<User>> {
    required("user_name", &user.user_name, 50)?;
    if user.password.is_empty() {
        return Err(ApiError::BadRequest("password must not be empty".to_string()));
    }
    max_len("location", &user.location, 50)?;
    max_len("gender", &user.gender, 50)?;
    max_len("constellation", &user.constellation, 50)?;
    if user.age.is_some_and(|age| age < 0) || user.play_count < 0 {
        return Err(ApiError::BadRequest(
            "age and play_count must not be negative".to_string(),
        ));
    }

    let created = users::create_user(&state.db, &user).await?;
    info!("Registered user {} ({})", created.id, created.user_name);
    Ok(Json(created))
}

/// GET /users/me
pub async fn read_users_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<User>> {
    let user = users::get_user(&state.db, auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User".to_string()))?;
    Ok(Json(user))
}
