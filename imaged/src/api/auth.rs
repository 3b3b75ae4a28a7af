//! HTTP Basic authentication middleware
//!
//! Verifies `Authorization: Basic` credentials against the accounts table
//! and makes the [`Account`] available to handlers as an `Extension`.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use super::{error::ApiError, AppState};
use crate::auth::accounts::{AccountService, AuthError};

/// Reject requests without valid Basic credentials
pub async fn require_basic_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (username, password) =
        basic_credentials(request.headers()).ok_or(ApiError::Unauthorized)?;

    let service = AccountService::new(state.db.pool().clone());
    match service.verify_credentials(&username, &password).await {
        Ok(account) => {
            request.extensions_mut().insert(account);
            Ok(next.run(request).await)
        }
        Err(AuthError::InvalidCredentials) => Err(ApiError::Unauthorized),
        Err(e) => Err(ApiError::Internal(e.into())),
    }
}

/// Decode `Authorization: Basic <base64(user:pass)>`
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
