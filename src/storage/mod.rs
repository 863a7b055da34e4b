// storage/mod.rs
// Key-value storage tiers

pub mod area;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod sqlite;
#[cfg(test)]
pub(crate) mod test_helpers;

use std::path::Path;
use std::sync::Arc;

// Re-export commonly used items
pub use area::{read_json, write_json, StorageArea, StorageTier, StorageTiers};
pub use memory::MemoryArea;
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
pub use sqlite::SqliteArea;

use crate::error_handling::StorageError;

/// Opens (creating if needed) the SQLite file at `db_path` and returns both tiers on it.
pub async fn open_sqlite_tiers(db_path: &Path) -> Result<StorageTiers, StorageError> {
    let pool = init_db_pool_with_path(db_path).await?;
    run_migrations(&pool).await?;
    Ok(StorageTiers::new(
        Arc::new(SqliteArea::new(Arc::clone(&pool), StorageTier::Sync)),
        Arc::new(SqliteArea::new(pool, StorageTier::Local)),
    ))
}

/// Returns a fresh pair of in-memory tiers.
pub fn memory_tiers() -> StorageTiers {
    StorageTiers::new(
        Arc::new(MemoryArea::new(StorageTier::Sync)),
        Arc::new(MemoryArea::new(StorageTier::Local)),
    )
}
