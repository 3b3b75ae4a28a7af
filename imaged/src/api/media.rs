//! Stored image serving
//!
//! GET /media/images/{name} - Serve a stored binary by file name

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};

use super::{error::ApiError, AppState};

/// Build the media router
pub fn router() -> Router<AppState> {
    Router::new().route("/media/images/{name}", get(get_image))
}

/// Serve a stored image with the content type it was fetched as
async fn get_image(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let image = state
        .images
        .store()
        .read_binary(&name)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, image.content_type),
            (
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable".to_string(),
            ),
        ],
        image.data,
    ))
}
