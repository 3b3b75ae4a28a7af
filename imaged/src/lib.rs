//! imaged - image download and storage service
//!
//! Accepts batches of image URLs, downloads each one, stores the binary
//! under a media root with a database record, and serves lookups by
//! source URL.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod images;
pub mod init;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

pub use config::Config;
use db::Database;
use images::{Fetcher, ImageDownloader, ImageStore, STAGING_DIR};

/// The imaged server instance
pub struct Server {
    config: Arc<Config>,
    db: Arc<Database>,
    images: Arc<ImageDownloader>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Server {
    /// Create a new server instance
    pub async fn new(config: Config) -> Result<Self> {
        let db = Database::new(config.db_path.as_deref()).await?;

        let store = ImageStore::new(db.pool().clone(), &config.media_root);
        let fetcher = Fetcher::new(config.fetch_timeout())?;
        let images = ImageDownloader::new(fetcher, store, config.media_root.join(STAGING_DIR));
        images.prepare_dirs().await?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config: Arc::new(config),
            db: Arc::new(db),
            images: Arc::new(images),
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Get the database handle
    pub fn db(&self) -> Arc<Database> {
        self.db.clone()
    }

    /// Build the router
    fn router(&self) -> Router {
        api::router(self.db.clone(), self.images.clone(), self.config.clone())
    }

    /// Run the server until shutdown
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("imaged listening on {}", local_addr);

        let router = self.router();
        let mut shutdown_rx = self.shutdown_rx.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_rx.changed().await.ok();
            })
            .await?;

        info!("imaged shutdown complete");
        Ok(())
    }

    /// Signal the server to shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}
