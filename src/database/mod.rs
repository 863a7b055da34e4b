//! The curated pages database.
//!
//! Records are persisted as one JSON array under [`PAGES_DB_KEY`] in the local
//! tier and are seeded from the bundled defaults the first time the process
//! starts against an empty tier.

mod defaults;

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::config::PAGES_DB_KEY;
use crate::domain::DomainResolver;
use crate::error_handling::StorageError;
use crate::models::PageRecord;
use crate::storage::{read_json, write_json, StorageArea};

pub use defaults::default_pages;

/// Anything that can list the pages known for a registrable domain.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Returns every record for `domain`; an empty vector when there are none.
    async fn find_by_domain(&self, domain: &str) -> Result<Vec<PageRecord>, StorageError>;
}

/// Known-page records keyed by registrable domain.
pub struct PagesDatabase {
    area: Arc<dyn StorageArea>,
    resolver: DomainResolver,
    defaults: Vec<PageRecord>,
}

impl PagesDatabase {
    /// Creates a database over `area` that seeds the bundled default pages.
    pub fn new(area: Arc<dyn StorageArea>, resolver: DomainResolver) -> Self {
        Self::with_defaults(area, resolver, default_pages())
    }

    /// Creates a database that seeds `defaults` instead of the bundled pages.
    pub fn with_defaults(
        area: Arc<dyn StorageArea>,
        resolver: DomainResolver,
        defaults: Vec<PageRecord>,
    ) -> Self {
        Self {
            area,
            resolver,
            defaults,
        }
    }

    /// Writes the default records unless records are already stored.
    ///
    /// Returns `true` when the defaults were written.
    pub async fn init_default_pages(&self) -> Result<bool, StorageError> {
        if self.area.get(PAGES_DB_KEY).await?.is_some() {
            debug!("Pages database already seeded");
            return Ok(false);
        }

        let records = self.normalize(self.defaults.clone());
        write_json(self.area.as_ref(), PAGES_DB_KEY, &records).await?;
        info!("Seeded pages database with {} default records", records.len());
        Ok(true)
    }

    /// Returns the records whose domain equals `domain` (case-insensitive).
    ///
    /// Matching is exact on the registrable domain: no subdomain wildcarding.
    pub async fn find_by_domain(&self, domain: &str) -> Result<Vec<PageRecord>, StorageError> {
        let domain = domain.to_ascii_lowercase();
        let records = self.all().await?;
        Ok(records
            .into_iter()
            .filter(|record| record.domain == domain)
            .collect())
    }

    /// Returns every stored record, in stored order.
    pub async fn all(&self) -> Result<Vec<PageRecord>, StorageError> {
        Ok(read_json::<Vec<PageRecord>>(self.area.as_ref(), PAGES_DB_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Replaces the stored records with `records`.
    ///
    /// Record domains are normalized first; records whose domain does not
    /// resolve are dropped. Returns the number of records stored.
    pub async fn import(&self, records: Vec<PageRecord>) -> Result<usize, StorageError> {
        let records = self.normalize(records);
        write_json(self.area.as_ref(), PAGES_DB_KEY, &records).await?;
        info!("Imported {} page records", records.len());
        Ok(records.len())
    }

    /// Renders every stored record as pretty-printed JSON.
    pub async fn export_json(&self) -> Result<String, StorageError> {
        let records = self.all().await?;
        serde_json::to_string_pretty(&records).map_err(|source| StorageError::SerializationError {
            key: PAGES_DB_KEY.to_string(),
            source,
        })
    }

    fn normalize(&self, records: Vec<PageRecord>) -> Vec<PageRecord> {
        records
            .into_iter()
            .filter_map(|mut record| match self.resolver.registrable_domain(&record.domain) {
                Some(domain) => {
                    record.domain = domain;
                    Some(record)
                }
                None => {
                    warn!(
                        "Dropping page record '{}': invalid domain '{}'",
                        record.title, record.domain
                    );
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl PageSource for PagesDatabase {
    async fn find_by_domain(&self, domain: &str) -> Result<Vec<PageRecord>, StorageError> {
        PagesDatabase::find_by_domain(self, domain).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryArea, StorageTier};

    fn test_db(defaults: Vec<PageRecord>) -> (Arc<MemoryArea>, PagesDatabase) {
        let area = Arc::new(MemoryArea::new(StorageTier::Local));
        let db = PagesDatabase::with_defaults(area.clone(), DomainResolver::default(), defaults);
        (area, db)
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let (area, db) = test_db(vec![PageRecord::new(
            "example.com",
            "X",
            "https://pages.example.org/X",
        )]);

        assert!(db.init_default_pages().await.unwrap());
        assert!(!db.init_default_pages().await.unwrap());
        assert_eq!(db.all().await.unwrap().len(), 1);
        assert!(area.peek(PAGES_DB_KEY).is_some());
    }

    #[tokio::test]
    async fn test_seed_keeps_existing_records() {
        let (_area, db) = test_db(vec![PageRecord::new("example.com", "Default", "u")]);
        db.import(vec![PageRecord::new("example.org", "Imported", "u2")])
            .await
            .unwrap();

        // Existing data wins over defaults
        assert!(!db.init_default_pages().await.unwrap());
        let all = db.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Imported");
    }

    #[tokio::test]
    async fn test_find_by_domain_exact_match_only() {
        let (_area, db) = test_db(vec![
            PageRecord::new("example.com", "A", "https://pages.example.org/A"),
            PageRecord::new("example.com", "B", "https://pages.example.org/B"),
            PageRecord::new("other.com", "C", "https://pages.example.org/C"),
        ]);
        db.init_default_pages().await.unwrap();

        let found = db.find_by_domain("EXAMPLE.com").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].title, "A");

        // A subdomain is not a registrable domain and does not match
        assert!(db.find_by_domain("shop.example.com").await.unwrap().is_empty());
        assert!(db.find_by_domain("unknown.net").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unseeded_database_is_empty() {
        let (_area, db) = test_db(Vec::new());
        assert!(db.all().await.unwrap().is_empty());
        assert!(db.find_by_domain("example.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_normalizes_and_drops_invalid_domains() {
        let (_area, db) = test_db(Vec::new());
        let stored = db
            .import(vec![
                PageRecord::new("Shop.Example.COM", "A", "u1"),
                PageRecord::new("192.168.0.1", "B", "u2"),
            ])
            .await
            .unwrap();
        assert_eq!(stored, 1);
        assert_eq!(db.all().await.unwrap()[0].domain, "example.com");
    }

    #[tokio::test]
    async fn test_export_json_lists_records() {
        let (_area, db) = test_db(vec![PageRecord::new("example.com", "A", "u1")]);
        db.init_default_pages().await.unwrap();
        let json = db.export_json().await.unwrap();
        let parsed: Vec<PageRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, db.all().await.unwrap());
    }

    #[tokio::test]
    async fn test_bundled_defaults_seed() {
        let area = Arc::new(MemoryArea::new(StorageTier::Local));
        let db = PagesDatabase::new(area, DomainResolver::default());
        db.init_default_pages().await.unwrap();
        assert!(!db.find_by_domain("example.com").await.unwrap().is_empty());
    }
}
