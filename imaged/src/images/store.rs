//! Image record storage
//!
//! Each record owns one binary under `<media_root>/images/`, named by the
//! record's `file_name` token plus the content-type extension. The row
//! and the binary are written together and deleted together.

use std::path::{Path, PathBuf};

use sqlx::SqlitePool;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::{remove_if_exists, ImageError, StagedFile};

/// Subdirectory of the media root holding stored binaries
pub const IMAGES_DIR: &str = "images";

const RECORD_COLUMNS: &str =
    "id, file_name, source_url, user_id, is_valid, image, content_type, local_file_path, created_at";

/// A stored image record
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ImageRecord {
    pub id: i64,
    /// Generated token, also the basename of the stored binary
    pub file_name: String,
    pub source_url: String,
    /// Owning account id
    pub user_id: String,
    pub is_valid: bool,
    /// Binary location relative to the media root
    pub image: Option<String>,
    /// Media type reported by the origin
    pub content_type: String,
    /// Where the binary was staged before being stored
    pub local_file_path: Option<String>,
    pub created_at: String,
}

/// Stored binary with the media type it was fetched as
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Image record store backed by SQLite and the media directory
#[derive(Clone)]
pub struct ImageStore {
    pool: SqlitePool,
    media_root: PathBuf,
}

impl ImageStore {
    /// Create a new image store
    pub fn new(pool: SqlitePool, media_root: impl Into<PathBuf>) -> Self {
        Self {
            pool,
            media_root: media_root.into(),
        }
    }

    /// Directory holding stored binaries
    pub fn images_dir(&self) -> PathBuf {
        self.media_root.join(IMAGES_DIR)
    }

    /// Store a staged download as a valid record
    ///
    /// `token` becomes both the record's `file_name` and the stored
    /// binary's basename. Returns `Ok(None)` on a uniqueness or
    /// foreign-key conflict; no row or binary is left behind in that case.
    /// The staged file itself is left for the caller to remove.
    pub async fn persist(
        &self,
        url: &str,
        token: &str,
        staged: &StagedFile,
        user_id: &str,
    ) -> Result<Option<ImageRecord>, ImageError> {
        let extension = staged
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let stored_name = format!("{}.{}", token, extension);
        let relative = format!("{}/{}", IMAGES_DIR, stored_name);
        let target = self.images_dir().join(&stored_name);

        // An existing binary under this name belongs to another record
        match copy_new(&staged.path, &target).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                warn!("Storage key {} already taken, skipping {}", stored_name, url);
                return Ok(None);
            }
            Err(e) => {
                remove_if_exists(&target).await.ok();
                return Err(e.into());
            }
        }

        let created_at = chrono::Utc::now().to_rfc3339();
        let inserted = sqlx::query_as::<_, ImageRecord>(&format!(
            "INSERT INTO images (file_name, source_url, user_id, is_valid, image, content_type, local_file_path, created_at)
             VALUES (?, ?, ?, 1, ?, ?, ?, ?)
             RETURNING {}",
            RECORD_COLUMNS
        ))
        .bind(token)
        .bind(url)
        .bind(user_id)
        .bind(&relative)
        .bind(&staged.content_type)
        .bind(staged.path.display().to_string())
        .bind(&created_at)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(record) => {
                info!("Image data saved for {}", url);
                debug!("Stored {} as {}", url, target.display());
                Ok(Some(record))
            }
            Err(sqlx::Error::Database(e))
                if e.is_unique_violation() || e.is_foreign_key_violation() =>
            {
                warn!("Integrity conflict storing image for {}: {}", url, e);
                remove_if_exists(&target).await?;
                Ok(None)
            }
            Err(e) => {
                remove_if_exists(&target).await.ok();
                Err(e.into())
            }
        }
    }

    /// Look up a record by source URL
    ///
    /// Validity is not filtered here. With duplicates, the oldest record wins.
    pub async fn get_by_url(&self, url: &str) -> Result<Option<ImageRecord>, ImageError> {
        let record = sqlx::query_as::<_, ImageRecord>(&format!(
            "SELECT {} FROM images WHERE source_url = ? ORDER BY id LIMIT 1",
            RECORD_COLUMNS
        ))
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// All valid records in insertion order
    pub async fn list_valid(&self) -> Result<Vec<ImageRecord>, ImageError> {
        let records = sqlx::query_as::<_, ImageRecord>(&format!(
            "SELECT {} FROM images WHERE is_valid = 1 ORDER BY id",
            RECORD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Read a stored binary by its file name (e.g. `<token>.png`)
    ///
    /// Returns `Ok(None)` for names that are not a plain file name, that
    /// no record refers to, or whose binary is missing.
    pub async fn read_binary(&self, name: &str) -> Result<Option<StoredImage>, ImageError> {
        if !is_plain_file_name(name) {
            return Ok(None);
        }

        let row: Option<(String,)> =
            sqlx::query_as("SELECT content_type FROM images WHERE image = ? LIMIT 1")
                .bind(format!("{}/{}", IMAGES_DIR, name))
                .fetch_optional(&self.pool)
                .await?;
        let Some((content_type,)) = row else {
            return Ok(None);
        };

        match tokio::fs::read(self.images_dir().join(name)).await {
            Ok(data) => Ok(Some(StoredImage { data, content_type })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a record and its stored binary
    pub async fn delete(&self, id: i64) -> Result<bool, ImageError> {
        let image: Option<(Option<String>,)> =
            sqlx::query_as("DELETE FROM images WHERE id = ? RETURNING image")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let Some((image,)) = image else {
            return Ok(false);
        };

        if let Some(relative) = image {
            remove_if_exists(&self.media_root.join(relative)).await?;
        }
        debug!("Deleted image record {}", id);
        Ok(true)
    }
}

/// Copy `from` to `to`, failing with `AlreadyExists` if `to` is present
async fn copy_new(from: &Path, to: &Path) -> std::io::Result<()> {
    let mut source = tokio::fs::File::open(from).await?;
    let mut dest = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(to)
        .await?;
    tokio::io::copy(&mut source, &mut dest).await?;
    dest.flush().await?;
    Ok(())
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\'])
}
