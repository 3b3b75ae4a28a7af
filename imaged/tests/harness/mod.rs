//! Integration Test Harness
//!
//! - `TestServer` - Runs a real imaged server on a random port with an
//!   in-memory database and a temporary media root
//! - `spawn_origin` - Local HTTP origin serving image fixtures
//!
//! # Example
//!
//! ```rust,ignore
//! let server = TestServer::start().await.unwrap();
//! let origin = spawn_origin().await;
//!
//! let resp = server
//!     .post_auth("/images", &json!({"source_url": [origin_url(origin, "/good.png")]}))
//!     .await
//!     .unwrap();
//! assert_eq!(resp.status(), 201);
//! ```

#![allow(dead_code)]

mod origin;
mod server;

pub use origin::{origin_url, spawn_origin, GOOD_PNG};
pub use server::{TestServer, TEST_PASSWORD, TEST_USERNAME};
