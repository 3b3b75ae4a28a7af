//! Image download and storage module
//!
//! Provides:
//! - Single-URL fetching into a staging directory
//! - Record persistence with the binary moved under the media root
//! - Sequential batch submission with per-item failure isolation

mod batch;
mod fetch;
mod store;

#[cfg(test)]
pub mod test_utils;

use std::path::Path;

use thiserror::Error;

pub use batch::ImageDownloader;
pub use fetch::{content_type_essence, extension_from_content_type, Fetcher, StagedFile};
pub use store::{ImageRecord, ImageStore, StoredImage, IMAGES_DIR};

/// Subdirectory of the media root used for in-flight downloads
pub const STAGING_DIR: &str = "staging";

/// Image pipeline errors
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("fetch failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Remove a file, treating "already gone" as success
pub(crate) async fn remove_if_exists(path: &Path) -> std::io::Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
