//! Account provisioning for the imaged_adduser tool

use std::path::Path;

use anyhow::{anyhow, bail, Result};
use tracing::info;

use crate::auth::accounts::{Account, AccountService};
use crate::db::Database;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Create an account in the database at `path`
///
/// The database (and schema) is created if it does not exist yet.
///
/// # Errors
/// * Password too short
/// * Username already taken
/// * Database creation fails
pub async fn add_user(path: &Path, username: &str, password: &str) -> Result<Account> {
    if username.is_empty() || username.contains(':') {
        bail!("Username must be non-empty and must not contain ':'");
    }

    if password.len() < MIN_PASSWORD_LEN {
        bail!("Password must be at least {} characters", MIN_PASSWORD_LEN);
    }

    let path_str = path
        .to_str()
        .ok_or_else(|| anyhow!("Database path is not valid UTF-8: {}", path.display()))?;

    info!("Opening database at {}", path.display());
    let db = Database::new(Some(path_str)).await?;

    let service = AccountService::new(db.pool().clone());
    let account = service.create_account(username, password).await?;
    info!("Created account '{}' ({})", username, account.id);

    Ok(account)
}
