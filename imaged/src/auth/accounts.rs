//! Account management service
//!
//! Handles account creation and credential checks for HTTP Basic auth.

use sqlx::sqlite::SqlitePool;
use thiserror::Error;

use super::{generate_salt, hash_password, verify_password};

/// Account data
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub created_at: String,
}

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username already exists")]
    UsernameExists,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Account service for authentication operations
pub struct AccountService {
    pool: SqlitePool,
}

impl AccountService {
    /// Create a new account service
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new account
    pub async fn create_account(&self, username: &str, password: &str) -> Result<Account, AuthError> {
        let existing: Option<(String,)> =
            sqlx::query_as("SELECT id FROM accounts WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        if existing.is_some() {
            return Err(AuthError::UsernameExists);
        }

        let id = uuid::Uuid::new_v4().to_string();
        let salt = generate_salt();
        let password_hash = hash_password(password, &salt);
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO accounts (id, username, password_hash, salt, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(username)
        .bind(&password_hash)
        .bind(&salt)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Account {
            id,
            username: username.to_string(),
            created_at: now,
        })
    }

    /// Check a username/password pair and return the matching account
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Account, AuthError> {
        let row: Option<(String, String, String, String)> = sqlx::query_as(
            "SELECT id, password_hash, salt, created_at FROM accounts WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        let (id, stored_hash, salt, created_at) = row.ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &salt, &stored_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Account {
            id,
            username: username.to_string(),
            created_at,
        })
    }
}
