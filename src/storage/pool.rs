//! SQLite pool for the on-disk storage tiers.
//!
//! Both tiers share one database file. The file and any missing parent
//! directories are created on first open, and every connection runs in WAL
//! mode so the CLI can read while a replay is writing.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::config::{DB_BUSY_TIMEOUT_SECS, DB_MAX_CONNECTIONS};
use crate::error_handling::StorageError;

/// Opens the tiers database at `db_path`, creating it when absent.
pub async fn init_db_pool_with_path(db_path: &Path) -> Result<Arc<Pool<Sqlite>>, StorageError> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            error!("Failed to create directory {}: {e}", parent.display());
            StorageError::FileCreationError(format!("{}: {e}", parent.display()))
        })?;
    }

    let existed = db_path.exists();
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(DB_BUSY_TIMEOUT_SECS));

    let pool = SqlitePoolOptions::new()
        .max_connections(DB_MAX_CONNECTIONS)
        .connect_with(options)
        .await
        .map_err(|e| {
            error!("Failed to open database {}: {e}", db_path.display());
            StorageError::SqlError(e)
        })?;

    if existed {
        debug!("Opened database {}", db_path.display());
    } else {
        info!("Created database {}", db_path.display());
    }
    Ok(Arc::new(pool))
}
