//! In-memory storage area.
//!
//! Used for tests and for running without a database file.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use super::area::{StorageArea, StorageTier};
use crate::error_handling::StorageError;

/// A storage area held entirely in process memory.
#[derive(Debug)]
pub struct MemoryArea {
    tier: StorageTier,
    entries: Mutex<BTreeMap<String, Value>>,
}

impl MemoryArea {
    /// Creates an empty area for `tier`.
    pub fn new(tier: StorageTier) -> Self {
        Self {
            tier,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Returns the raw value under `key` without going through the async API.
    pub fn peek(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Value>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StorageArea for MemoryArea {
    fn tier(&self) -> StorageTier {
        self.tier
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.lock().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{read_json, write_json};
    use serde_json::json;

    #[tokio::test]
    async fn test_set_get_remove() {
        let area = MemoryArea::new(StorageTier::Local);
        assert_eq!(area.get("a").await.unwrap(), None);

        area.set("a", json!(1)).await.unwrap();
        assert_eq!(area.get("a").await.unwrap(), Some(json!(1)));
        assert_eq!(area.peek("a"), Some(json!(1)));

        area.remove("a").await.unwrap();
        assert_eq!(area.get("a").await.unwrap(), None);
        // Removing twice is fine
        area.remove("a").await.unwrap();
    }

    #[tokio::test]
    async fn test_keys_are_sorted() {
        let area = MemoryArea::new(StorageTier::Sync);
        area.set("b", json!(true)).await.unwrap();
        area.set("a", json!(false)).await.unwrap();
        assert_eq!(area.keys().await.unwrap(), vec!["a", "b"]);
        assert_eq!(area.tier(), StorageTier::Sync);
    }

    #[tokio::test]
    async fn test_json_helpers_round_trip_and_type_mismatch() {
        let area = MemoryArea::new(StorageTier::Local);
        write_json(&area, "list", &vec!["x".to_string()])
            .await
            .unwrap();
        let list: Option<Vec<String>> = read_json(&area, "list").await.unwrap();
        assert_eq!(list, Some(vec!["x".to_string()]));

        // Reading the same key as the wrong type is a serialization error
        let wrong = read_json::<bool>(&area, "list").await;
        assert!(matches!(
            wrong,
            Err(StorageError::SerializationError { ref key, .. }) if key == "list"
        ));
    }
}
