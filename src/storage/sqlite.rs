//! SQLite-backed storage area.
//!
//! Both tiers share one `kv_store` table; the `tier` column keeps their keys
//! apart.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use sqlx::{Pool, Row, Sqlite};

use super::area::{StorageArea, StorageTier};
use crate::error_handling::StorageError;

/// A storage tier persisted in SQLite.
#[derive(Debug, Clone)]
pub struct SqliteArea {
    pool: Arc<Pool<Sqlite>>,
    tier: StorageTier,
}

impl SqliteArea {
    /// Creates an area for `tier` on an already migrated pool.
    pub fn new(pool: Arc<Pool<Sqlite>>, tier: StorageTier) -> Self {
        Self { pool, tier }
    }
}

#[async_trait]
impl StorageArea for SqliteArea {
    fn tier(&self) -> StorageTier {
        self.tier
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE tier = ? AND key = ?")
            .bind(self.tier.as_ref())
            .bind(key)
            .fetch_optional(self.pool.as_ref())
            .await?;

        match row {
            Some(row) => {
                let raw: String = row.try_get("value")?;
                serde_json::from_str(&raw)
                    .map(Some)
                    .map_err(|source| StorageError::SerializationError {
                        key: key.to_string(),
                        source,
                    })
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&value).map_err(|source| {
            StorageError::SerializationError {
                key: key.to_string(),
                source,
            }
        })?;

        sqlx::query(
            "INSERT INTO kv_store (tier, key, value, updated_at_ms) VALUES (?, ?, ?, ?)
             ON CONFLICT(tier, key) DO UPDATE SET
                value = excluded.value,
                updated_at_ms = excluded.updated_at_ms",
        )
        .bind(self.tier.as_ref())
        .bind(key)
        .bind(raw)
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(self.pool.as_ref())
        .await?;

        debug!("Stored {} key '{}'", self.tier, key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_store WHERE tier = ? AND key = ?")
            .bind(self.tier.as_ref())
            .bind(key)
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query("SELECT key FROM kv_store WHERE tier = ? ORDER BY key")
            .bind(self.tier.as_ref())
            .fetch_all(self.pool.as_ref())
            .await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("key").map_err(StorageError::from))
            .collect()
    }
}
