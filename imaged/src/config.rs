//! Server configuration
//!
//! Layered with figment: built-in defaults, then an optional TOML file,
//! then `IMAGED_*` environment variables. CLI flags are applied on top by
//! the binary.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// SQLite file; None = in-memory
    pub db_path: Option<String>,
    /// Root for stored binaries (`images/`) and downloads in flight (`staging/`)
    pub media_root: PathBuf,
    /// Public prefix for stored binaries in API responses
    pub media_url: String,
    /// Per-request fetch timeout; None = wait indefinitely
    pub fetch_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            db_path: None,
            media_root: PathBuf::from("media"),
            media_url: "/media/".to_string(),
            fetch_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from defaults, `path` (if it exists) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        let config = figment.merge(Env::prefixed("IMAGED_")).extract()?;
        Ok(config)
    }

    /// Fetch timeout as a Duration
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }
}
