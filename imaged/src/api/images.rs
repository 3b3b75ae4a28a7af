//! Image endpoints
//!
//! GET  /images              - List valid image records
//! GET  /images?url=<url>    - Look up a record by source URL
//! POST /images              - Download and store a batch of URLs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{error::ApiError, AppState};
use crate::auth::accounts::Account;
use crate::images::ImageRecord;

/// Build the images router
pub fn router() -> Router<AppState> {
    Router::new().route("/images", get(get_images).post(submit_images))
}

/// Lookup query params
#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub url: Option<String>,
}

/// Batch submission request
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub source_url: Vec<String>,
}

/// Serialized image record
#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub id: i64,
    pub file_name: String,
    pub source_url: String,
    pub user: String,
    pub is_valid: bool,
    /// Public URL of the stored binary
    pub image: Option<String>,
    pub content_type: String,
    pub local_file_path: Option<String>,
    pub created_at: String,
}

impl ImageResponse {
    fn from_record(record: ImageRecord, media_url: &str) -> Self {
        Self {
            id: record.id,
            file_name: record.file_name,
            source_url: record.source_url,
            user: record.user_id,
            is_valid: record.is_valid,
            image: record.image.map(|path| format!("{}{}", media_url, path)),
            content_type: record.content_type,
            local_file_path: record.local_file_path,
            created_at: record.created_at,
        }
    }
}

/// GET /images
async fn get_images(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, ApiError> {
    let media_url = state.config.media_url.as_str();

    if let Some(url) = query.url {
        let Some(record) = state.images.store().get_by_url(&url).await? else {
            debug!("No image recorded for {}", url);
            return Err(ApiError::NotFound);
        };
        return Ok(Json(ImageResponse::from_record(record, media_url)).into_response());
    }

    let records: Vec<ImageResponse> = state
        .images
        .store()
        .list_valid()
        .await?
        .into_iter()
        .map(|record| ImageResponse::from_record(record, media_url))
        .collect();
    Ok(Json(records).into_response())
}

/// POST /images
async fn submit_images(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Json(request): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<Vec<ImageResponse>>), ApiError> {
    let records = state
        .images
        .submit_batch(&request.source_url, &account.id)
        .await?;

    let media_url = state.config.media_url.as_str();
    let body = records
        .into_iter()
        .map(|record| ImageResponse::from_record(record, media_url))
        .collect();
    Ok((StatusCode::CREATED, Json(body)))
}
