//! Batch submission of image URLs
//!
//! URLs are processed one at a time, in order. A response missing its
//! required headers, or a storage conflict, is logged and skipped; the
//! rest of the batch still runs. Transport errors, staging I/O and
//! non-integrity database errors abort the batch; records already stored
//! by then are kept.

use std::path::PathBuf;

use tracing::info;

use super::{remove_if_exists, Fetcher, ImageError, ImageRecord, ImageStore};

/// Downloads URLs and stores them as image records
#[derive(Clone)]
pub struct ImageDownloader {
    fetcher: Fetcher,
    store: ImageStore,
    staging_dir: PathBuf,
}

impl ImageDownloader {
    pub fn new(fetcher: Fetcher, store: ImageStore, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            store,
            staging_dir: staging_dir.into(),
        }
    }

    /// Record store used for persistence and queries
    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    /// Create the staging and storage directories if missing
    pub async fn prepare_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.staging_dir).await?;
        tokio::fs::create_dir_all(self.store.images_dir()).await?;
        Ok(())
    }

    /// Fetch and store each URL, returning the records created
    pub async fn submit_batch(
        &self,
        urls: &[String],
        user_id: &str,
    ) -> Result<Vec<ImageRecord>, ImageError> {
        let mut created = Vec::with_capacity(urls.len());

        for url in urls {
            let token = uuid::Uuid::new_v4().to_string();

            let Some(staged) = self.fetcher.fetch(url, &self.staging_dir, &token).await? else {
                continue;
            };

            let persisted = self.store.persist(url, &token, &staged, user_id).await;
            remove_if_exists(&staged.path).await?;

            if let Some(record) = persisted? {
                created.push(record);
            }
        }

        info!(
            "Stored {} of {} submitted images for user {}",
            created.len(),
            urls.len(),
            user_id
        );
        Ok(created)
    }
}
