//! The key-value storage area abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use strum_macros::{AsRefStr, Display};

use crate::error_handling::StorageError;

/// The two independent storage tiers.
///
/// `Sync` follows the user's account across installs; `Local` stays on this
/// machine. A given key always lives in exactly one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum StorageTier {
    /// Account-synchronized tier
    Sync,
    /// Machine-local tier
    Local,
}

/// A flat, string-keyed store of JSON values.
#[async_trait]
pub trait StorageArea: Send + Sync {
    /// Tier this area implements.
    fn tier(&self) -> StorageTier;

    /// Reads the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Deletes `key`. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Lists every key in this area.
    async fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Both tiers, handed to anything that needs to pick one.
#[derive(Clone)]
pub struct StorageTiers {
    /// Account-synchronized area
    pub sync: Arc<dyn StorageArea>,
    /// Machine-local area
    pub local: Arc<dyn StorageArea>,
}

impl StorageTiers {
    /// Bundles a sync and a local area.
    pub fn new(sync: Arc<dyn StorageArea>, local: Arc<dyn StorageArea>) -> Self {
        Self { sync, local }
    }

    /// Returns the area backing `tier`.
    pub fn area(&self, tier: StorageTier) -> &Arc<dyn StorageArea> {
        match tier {
            StorageTier::Sync => &self.sync,
            StorageTier::Local => &self.local,
        }
    }
}

/// Reads and deserializes the value under `key`.
pub async fn read_json<T: DeserializeOwned>(
    area: &dyn StorageArea,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match area.get(key).await? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StorageError::SerializationError {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Serializes `value` and stores it under `key`.
pub async fn write_json<T: Serialize + ?Sized>(
    area: &dyn StorageArea,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let value = serde_json::to_value(value).map_err(|source| StorageError::SerializationError {
        key: key.to_string(),
        source,
    })?;
    area.set(key, value).await
}
