// storage/migrations.rs
// Schema setup for the key-value tiers

use sqlx::{Pool, Sqlite};

use crate::error_handling::StorageError;

/// Creates the `kv_store` table if it does not exist yet.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), StorageError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS kv_store (
            tier TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at_ms INTEGER NOT NULL,
            PRIMARY KEY (tier, key)
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}
