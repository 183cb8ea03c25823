//! HTTP API handlers for xiamiu-api

pub mod albums;
pub mod artists;
pub mod auth;
pub mod buildinfo;
pub mod comments;
pub mod genres;
pub mod health;
pub mod search;
pub mod songs;
pub mod users;
pub mod validate;

pub use auth::{auth_middleware, AuthUser};
pub use buildinfo::get_build_info;
pub use health::health_routes;

use axum::Json;
use serde_json::{json, Value};

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to Xiamiu API" }))
}
