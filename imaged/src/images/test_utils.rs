//! Local origin server for fetcher and batch tests
//!
//! Routes:
//! - `/a.png` - PNG body with content-type and content-length
//! - `/photo` - JPEG body with a parameterised content-type
//! - `/page` - HTML body, to check the stored content type is kept
//! - `/no-type` - body with content-length but no content-type
//! - `/chunked` - streamed body with content-type but no content-length

use std::net::SocketAddr;

use axum::{
    body::{Body, Bytes},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;

/// PNG signature followed by a few payload bytes
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDRfake";

/// Build the origin router
pub fn origin_router() -> Router {
    Router::new()
        .route(
            "/a.png",
            get(|| async { ([(header::CONTENT_TYPE, "image/png")], PNG_BYTES) }),
        )
        .route(
            "/photo",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "image/jpeg; charset=binary")],
                    &b"\xff\xd8\xff\xe0jpeg"[..],
                )
            }),
        )
        .route(
            "/page",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                    "<html></html>",
                )
            }),
        )
        .route("/no-type", get(no_content_type))
        .route("/chunked", get(chunked))
}

async fn no_content_type() -> Response {
    Response::new(Body::from("raw bytes"))
}

async fn chunked() -> impl IntoResponse {
    let chunks = vec![
        Ok::<_, std::io::Error>(Bytes::from_static(b"GIF89a")),
        Ok(Bytes::from_static(b"rest")),
    ];
    (
        [(header::CONTENT_TYPE, "image/gif")],
        Body::from_stream(futures_util::stream::iter(chunks)),
    )
}

/// Serve the origin router on a random local port
pub async fn spawn_origin() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind origin server");
    let addr = listener.local_addr().expect("Failed to get origin address");
    tokio::spawn(async move {
        axum::serve(listener, origin_router()).await.ok();
    });
    addr
}
