//! Single-URL image fetcher
//!
//! A fetch is only accepted when the response carries both a
//! `content-length` and a `content-type` header. The body is written to
//! `<dir>/<base_name>.<ext>` where `ext` is the content-type subtype.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Client;
use tracing::{debug, error, info};

use super::{remove_if_exists, ImageError};

/// Extension used when the content-type subtype is unusable as a file suffix
const FALLBACK_EXTENSION: &str = "bin";

/// A download written to the staging directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub path: PathBuf,
    /// Media type essence from the response, e.g. `image/png`
    pub content_type: String,
}

/// HTTP fetcher for image URLs
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a fetcher; `timeout` of None leaves requests unbounded
    pub fn new(timeout: Option<Duration>) -> Result<Self, ImageError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Download `url` into `dir` as `<base_name>.<ext>`
    ///
    /// Returns `Ok(None)` when a required header is missing; nothing is
    /// written in that case. Transport failures surface as
    /// [`ImageError::Transport`].
    pub async fn fetch(
        &self,
        url: &str,
        dir: &Path,
        base_name: &str,
    ) -> Result<Option<StagedFile>, ImageError> {
        debug!("Downloading image from: {}", url);

        let response = self.client.get(url).send().await?;

        let content_length = header_value(response.headers(), CONTENT_LENGTH);
        let content_type = header_value(response.headers(), CONTENT_TYPE);
        let (Some(_), Some(content_type)) = (content_length, content_type) else {
            error!("Missing content length or content type headers for {}", url);
            return Ok(None);
        };

        let extension = extension_from_content_type(&content_type);
        let data = response.bytes().await?;

        let path = dir.join(format!("{}.{}", base_name, extension));
        if let Err(e) = tokio::fs::write(&path, &data).await {
            remove_if_exists(&path).await.ok();
            return Err(e.into());
        }

        info!("File downloaded from {} and saved as {}", url, path.display());
        Ok(Some(StagedFile {
            path,
            content_type: content_type_essence(&content_type),
        }))
    }
}

/// Header value as a string, with empty values treated as absent
fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Media type without parameters, lowercased
pub fn content_type_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Derive a file extension from a content-type value
///
/// `image/png` gives `png`; parameters such as `; charset=...` are ignored.
pub fn extension_from_content_type(content_type: &str) -> String {
    let essence = content_type.split(';').next().unwrap_or_default();
    let subtype = essence.rsplit('/').next().unwrap_or_default().trim();

    let usable = !subtype.is_empty()
        && !subtype.starts_with('.')
        && subtype
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    if usable {
        subtype.to_ascii_lowercase()
    } else {
        FALLBACK_EXTENSION.to_string()
    }
}
