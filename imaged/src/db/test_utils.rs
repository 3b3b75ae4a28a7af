//! Shared test utilities for database operations
//!
//! Provides a common test_pool() function that creates an in-memory
//! database with the full schema, so test modules never carry their
//! own copy of the table definitions.

use sqlx::SqlitePool;

use super::Database;

/// Create an in-memory test database pool with full schema
pub async fn test_pool() -> SqlitePool {
    let db = Database::new(None)
        .await
        .expect("Failed to create test database");
    db.pool().clone()
}

/// Insert an account row directly and return its id
pub async fn insert_account(pool: &SqlitePool, username: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO accounts (id, username, password_hash, salt) VALUES (?, ?, 'x', 'y')")
        .bind(&id)
        .bind(username)
        .execute(pool)
        .await
        .expect("Failed to insert test account");
    id
}
