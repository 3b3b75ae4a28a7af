//! HTTP API module - REST endpoints

mod auth;
mod error;
mod images;
mod media;

use std::sync::Arc;

use axum::{
    extract::State, http::StatusCode, middleware, response::IntoResponse, routing::get, Json,
    Router,
};
use serde::Serialize;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::db::Database;
use crate::images::ImageDownloader;
use crate::Config;
pub use error::{ApiError, INTERNAL_ERROR_BODY};
pub use images::{ImageResponse, SubmitRequest};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub images: Arc<ImageDownloader>,
    pub config: Arc<Config>,
}

/// Build the API router
pub fn router(
    db: Arc<Database>,
    downloader: Arc<ImageDownloader>,
    config: Arc<Config>,
) -> Router {
    let state = AppState {
        db,
        images: downloader,
        config,
    };

    let protected = images::router().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth::require_basic_auth,
    ));

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(root))
        .merge(protected)
        .merge(media::router())
        .with_state(state)
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(TraceLayer::new_for_http())
}

/// Root endpoint
async fn root() -> impl IntoResponse {
    Json(RootResponse {
        name: "imaged",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct RootResponse {
    name: &'static str,
    version: &'static str,
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                database: "ok",
            }),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy",
                database: "error",
            }),
        ),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
}
