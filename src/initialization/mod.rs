//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger
//! - Storage tiers (SQLite file, created on first run)
//! - Domain resolver

mod logger;

use log::info;

use crate::config::Config;
use crate::domain::{DomainResolver, ResolveOptions};
use crate::error_handling::InitializationError;
use crate::storage::{open_sqlite_tiers, StorageTiers};

// Re-export public API
pub use logger::init_logger_with;

/// Opens the storage tiers described by `config`.
///
/// # Errors
///
/// Returns `InitializationError::StorageError` if the database cannot be
/// created or migrated.
pub async fn init_storage(config: &Config) -> Result<StorageTiers, InitializationError> {
    let tiers = open_sqlite_tiers(&config.db_path).await?;
    info!("Storage tiers ready at {}", config.db_path.display());
    Ok(tiers)
}

/// Builds the domain resolver described by `config`.
pub fn init_resolver(config: &Config) -> DomainResolver {
    DomainResolver::new(ResolveOptions {
        allow_private_domains: config.allow_private_domains,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_resolver_honors_icann_only() {
        let config = Config {
            allow_private_domains: false,
            ..Default::default()
        };
        let resolver = init_resolver(&config);
        assert_eq!(
            resolver.registrable_domain("user.github.io").as_deref(),
            Some("github.io")
        );
    }

    #[tokio::test]
    async fn test_init_storage_creates_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            db_path: dir.path().join("pages.db"),
            ..Default::default()
        };
        let tiers = init_storage(&config).await.unwrap();
        assert!(config.db_path.exists());
        assert!(tiers.sync.keys().await.unwrap().is_empty());
    }
}
