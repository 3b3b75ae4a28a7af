//! imaged - image download and storage service

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use imaged::{Config, Server};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Image download and storage service
#[derive(Parser, Debug)]
#[command(name = "imaged", version, about = "Image download and storage service")]
struct Args {
    /// TOML configuration file (ignored if missing)
    #[arg(short, long, default_value = "imaged.toml")]
    config: PathBuf,

    /// Address to listen on
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Path to SQLite database file (in-memory if unset)
    #[arg(short, long)]
    database: Option<String>,

    /// Directory for stored and staged images
    #[arg(long)]
    media_root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imaged=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = Config::load(Some(&args.config))?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(database) = args.database {
        config.db_path = Some(database);
    }
    if let Some(media_root) = args.media_root {
        config.media_root = media_root;
    }

    let server = Arc::new(Server::new(config).await?);

    let signal_server = server.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
            signal_server.shutdown();
        }
    });

    server.run().await?;

    Ok(())
}
