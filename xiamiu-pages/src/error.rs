//! Error type for page handlers
//!
//! Failures render as HTML pages, not JSON.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::pages::layout::{not_found_body, shell};

#[derive(Debug, Error)]
pub enum PageError {
    /// Unknown id in the path (404 page)
    #[error("{0} not found")]
    NotFound(String),

    /// Database or other xiamiu-common failure (500 page)
    #[error(transparent)]
    Common(#[from] xiamiu_common::Error),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                Html(shell("404", &not_found_body(&what))),
            )
                .into_response(),
            PageError::Common(err) => {
                error!("Page rendering failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(shell("500", "<h1>500</h1>\n<p>服务器错误</p>")),
                )
                    .into_response()
            }
        }
    }
}

pub type PageResult<T> = Result<T, PageError>;
