//! TestServer - in-process end-to-end harness
//!
//! Runs the real `Server` on a random port with an in-memory database and
//! a temporary media root, with one account ready for Basic auth.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use imaged::auth::accounts::AccountService;
use imaged::images::STAGING_DIR;
use imaged::{Config, Server};
use reqwest::Client;
use tempfile::TempDir;
use tokio::task::JoinHandle;

pub const TEST_USERNAME: &str = "tester";
pub const TEST_PASSWORD: &str = "password123";

/// Test harness running a real imaged server
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    /// Account id of the test user
    pub user_id: String,
    server: Arc<Server>,
    _handle: JoinHandle<()>,
    /// Media root (cleaned up on drop)
    media: TempDir,
}

impl TestServer {
    /// Start a new test server instance
    pub async fn start() -> Result<Self> {
        let media = TempDir::new()?;

        // Find a random available port
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        drop(listener);

        let config = Config {
            bind_addr: addr,
            db_path: None,
            media_root: media.path().to_path_buf(),
            fetch_timeout_secs: Some(5),
            ..Config::default()
        };

        let server = Arc::new(Server::new(config).await?);

        let account = AccountService::new(server.db().pool().clone())
            .create_account(TEST_USERNAME, TEST_PASSWORD)
            .await?;

        let server_clone = server.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = server_clone.run().await {
                eprintln!("Server error: {}", e);
            }
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        // Poll until server is ready (max 2 seconds)
        let mut ready = false;
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if client
                .get(format!("http://{}/health", addr))
                .send()
                .await
                .is_ok()
            {
                ready = true;
                break;
            }
        }

        if !ready {
            panic!("Server failed to start within 2 seconds");
        }

        Ok(Self {
            addr,
            client,
            user_id: account.id,
            server,
            _handle: handle,
            media,
        })
    }

    /// Get the base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Media root used by this server
    pub fn media_root(&self) -> &Path {
        self.media.path()
    }

    /// Files currently in the staging directory
    pub fn staged_files(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.media.path().join(STAGING_DIR))
            .expect("staging dir missing")
            .map(|e| e.expect("bad dir entry").path())
            .collect()
    }

    /// Make an unauthenticated GET request
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}{}", self.base_url(), path))
            .send()
            .await?)
    }

    /// Make a GET request as the test user
    pub async fn get_auth(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}{}", self.base_url(), path))
            .basic_auth(TEST_USERNAME, Some(TEST_PASSWORD))
            .send()
            .await?)
    }

    /// Look up a record by source URL as the test user
    pub async fn lookup(&self, url: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}/images", self.base_url()))
            .query(&[("url", url)])
            .basic_auth(TEST_USERNAME, Some(TEST_PASSWORD))
            .send()
            .await?)
    }

    /// Make a POST request with JSON body as the test user
    pub async fn post_auth<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}{}", self.base_url(), path))
            .basic_auth(TEST_USERNAME, Some(TEST_PASSWORD))
            .json(body)
            .send()
            .await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.shutdown();
    }
}
