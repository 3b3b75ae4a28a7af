//! Request-level error boundary
//!
//! Every handler returns `Result<_, ApiError>`; this is the single place
//! where failures become HTTP responses. Internal errors are logged in
//! full and reported to the client without detail. Panics are caught by
//! the router's `CatchPanicLayer` and answered the same way.

use std::any::Any;

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::images::ImageError;

/// Body of every 500 response
pub const INTERNAL_ERROR_BODY: &str = "something went wrong";

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ImageError> for ApiError {
    fn from(e: ImageError) -> Self {
        ApiError::Internal(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(serde_json::json!([]))).into_response()
            }
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"imaged\"")],
                "unauthorized",
            )
                .into_response(),
            ApiError::Internal(e) => {
                error!("Unhandled error: {:?}", e);
                internal_error()
            }
        }
    }
}

/// Panic handler for `CatchPanicLayer`
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    error!("Handler panicked: {}", detail);
    internal_error()
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
}
