//! Origin server standing in for the remote image hosts

use std::net::SocketAddr;

use axum::{
    body::{Body, Bytes},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;

/// Body served by `/good.png`
pub const GOOD_PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDRgood";

fn origin_router() -> Router {
    Router::new()
        .route(
            "/good.png",
            get(|| async { ([(header::CONTENT_TYPE, "image/png")], GOOD_PNG) }),
        )
        .route(
            "/other.gif",
            get(|| async { ([(header::CONTENT_TYPE, "image/gif")], &b"GIF89a-other"[..]) }),
        )
        .route(
            "/page.html",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                    "<html>not an image</html>",
                )
            }),
        )
        .route("/bad", get(no_content_type))
        .route("/streamed", get(no_content_length))
}

async fn no_content_type() -> Response {
    Response::new(Body::from("no content type here"))
}

async fn no_content_length() -> impl IntoResponse {
    let chunks = vec![Ok::<_, std::io::Error>(Bytes::from_static(b"GIF89a"))];
    (
        [(header::CONTENT_TYPE, "image/gif")],
        Body::from_stream(futures_util::stream::iter(chunks)),
    )
}

/// Serve the fixtures on a random local port
pub async fn spawn_origin() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind origin");
    let addr = listener.local_addr().expect("Failed to get origin address");
    tokio::spawn(async move {
        axum::serve(listener, origin_router()).await.ok();
    });
    addr
}

/// Full URL for a fixture path
pub fn origin_url(origin: SocketAddr, path: &str) -> String {
    format!("http://{}{}", origin, path)
}
