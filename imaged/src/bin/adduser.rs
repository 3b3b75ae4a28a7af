//! imaged_adduser - Create an account allowed to submit images
//!
//! Credentials are read from the environment so they never appear in
//! shell history.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// imaged account creation tool
#[derive(Parser, Debug)]
#[command(
    name = "imaged_adduser",
    version,
    about = "Create an imaged account (IMAGED_USERNAME / IMAGED_PASSWORD)"
)]
struct Args {
    /// Path to SQLite database file (created if missing)
    #[arg(short, long)]
    database: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imaged=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let username = std::env::var("IMAGED_USERNAME")
        .map_err(|_| anyhow::anyhow!("IMAGED_USERNAME environment variable is required"))?;

    let password = std::env::var("IMAGED_PASSWORD")
        .map_err(|_| anyhow::anyhow!("IMAGED_PASSWORD environment variable is required"))?;

    imaged::init::add_user(&args.database, &username, &password).await?;

    Ok(())
}
