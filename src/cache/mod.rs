//! Read-through cache in front of the pages database.
//!
//! Entries are keyed by registrable domain and created on first lookup. A
//! lookup that arrives while a load for the same key is in flight attaches to
//! that load instead of issuing another query, so every concurrent caller sees
//! the same records.
//!
//! Entries are never evicted: a background process is short-lived and the
//! dataset is small. A failed load is not cached; the next lookup retries.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, warn};

use crate::database::PageSource;
use crate::error_handling::{LookupError, StorageError};
use crate::models::PageRecord;

/// Records shared by every caller that looked up the same domain.
pub type CachedPages = Arc<[PageRecord]>;

type LoadResult = Result<CachedPages, LookupError>;
type PendingLoad = Shared<BoxFuture<'static, LoadResult>>;
type EntryMap = Arc<Mutex<HashMap<String, CacheEntry>>>;

enum CacheEntry {
    Loading(PendingLoad),
    Loaded(CachedPages),
    Absent,
}

/// Lookup counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from memory
    pub hits: usize,
    /// Lookups that started a load
    pub misses: usize,
    /// Lookups that attached to a load already in flight
    pub collapsed: usize,
    /// Entries currently held (any state)
    pub entries: usize,
}

/// Read-through cache over a [`PageSource`].
pub struct StorageCache {
    source: Arc<dyn PageSource>,
    entries: EntryMap,
    hits: AtomicUsize,
    misses: AtomicUsize,
    collapsed: AtomicUsize,
}

impl StorageCache {
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self {
            source,
            entries: Arc::new(Mutex::new(HashMap::new())),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
            collapsed: AtomicUsize::new(0),
        }
    }

    /// Returns the records for `domain`, loading them on first use.
    ///
    /// # Errors
    ///
    /// Returns `LookupError` when the underlying load fails. Every caller
    /// attached to that load receives the same error.
    pub async fn lookup(&self, domain: &str) -> LoadResult {
        let key = domain.to_ascii_lowercase();

        let pending = {
            let mut entries = lock(&self.entries);
            match entries.get(&key) {
                Some(CacheEntry::Loaded(records)) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Ok(Arc::clone(records));
                }
                Some(CacheEntry::Absent) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Ok(empty_pages());
                }
                Some(CacheEntry::Loading(pending)) => {
                    self.collapsed.fetch_add(1, Ordering::Relaxed);
                    debug!("Attaching to in-flight load for {key}");
                    pending.clone()
                }
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    let pending = self.start_load(key.clone());
                    entries.insert(key, CacheEntry::Loading(pending.clone()));
                    pending
                }
            }
        };

        pending.await
    }

    /// Returns a snapshot of the lookup counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            collapsed: self.collapsed.load(Ordering::Relaxed),
            entries: lock(&self.entries).len(),
        }
    }

    fn start_load(&self, key: String) -> PendingLoad {
        let source = Arc::clone(&self.source);
        let entries = Arc::clone(&self.entries);

        async move {
            debug!("Cache miss for {key}, querying pages database");
            let outcome = source.find_by_domain(&key).await;
            settle(&entries, key, outcome)
        }
        .boxed()
        .shared()
    }
}

/// Moves a finished load out of the `Loading` state before waiters are woken.
fn settle(
    entries: &EntryMap,
    key: String,
    outcome: Result<Vec<PageRecord>, StorageError>,
) -> LoadResult {
    let mut entries = lock(entries);
    match outcome {
        Ok(records) if records.is_empty() => {
            entries.insert(key, CacheEntry::Absent);
            Ok(empty_pages())
        }
        Ok(records) => {
            let records: CachedPages = records.into();
            entries.insert(key, CacheEntry::Loaded(Arc::clone(&records)));
            Ok(records)
        }
        Err(e) => {
            warn!("Page lookup for {key} failed: {e}");
            entries.remove(&key);
            Err(LookupError {
                domain: key,
                source: Arc::new(e),
            })
        }
    }
}

fn empty_pages() -> CachedPages {
    Arc::from(Vec::new())
}

fn lock(entries: &EntryMap) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    /// Source that counts queries and can hold them until released.
    struct GatedSource {
        records: Vec<PageRecord>,
        calls: AtomicUsize,
        gate: Notify,
        gated: bool,
        fail: bool,
    }

    impl GatedSource {
        fn new(records: Vec<PageRecord>) -> Self {
            Self {
                records,
                calls: AtomicUsize::new(0),
                gate: Notify::new(),
                gated: false,
                fail: false,
            }
        }
    }

    #[async_trait]
    impl PageSource for GatedSource {
        async fn find_by_domain(&self, domain: &str) -> Result<Vec<PageRecord>, StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.gated {
                self.gate.notified().await;
            }
            if self.fail {
                return Err(StorageError::BackendError("unavailable".to_string()));
            }
            Ok(self
                .records
                .iter()
                .filter(|r| r.domain == domain)
                .cloned()
                .collect())
        }
    }

    fn record(domain: &str, title: &str) -> PageRecord {
        PageRecord::new(domain, title, format!("https://pages.example.org/{title}"))
    }

    #[tokio::test]
    async fn test_second_lookup_is_served_from_memory() {
        let source = Arc::new(GatedSource::new(vec![record("example.com", "X")]));
        let cache = StorageCache::new(source.clone());

        let first = cache.lookup("example.com").await.unwrap();
        let second = cache.lookup("EXAMPLE.COM").await.unwrap();

        assert_eq!(first.len(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.entries, 1);
    }

    #[tokio::test]
    async fn test_absent_domain_is_cached() {
        let source = Arc::new(GatedSource::new(Vec::new()));
        let cache = StorageCache::new(source.clone());

        assert!(cache.lookup("other.com").await.unwrap().is_empty());
        assert!(cache.lookup("other.com").await.unwrap().is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_lookups_share_one_load() {
        let mut source = GatedSource::new(vec![record("example.com", "X")]);
        source.gated = true;
        let source = Arc::new(source);
        let cache = Arc::new(StorageCache::new(source.clone()));

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.lookup("example.com").await })
            })
            .collect();

        // Let every waiter reach the pending load before releasing it
        while cache.stats().collapsed < 2 {
            tokio::task::yield_now().await;
        }
        source.gate.notify_one();

        let mut results = Vec::new();
        for waiter in waiters {
            results.push(waiter.await.unwrap().unwrap());
        }

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
        assert_eq!(cache.stats().misses, 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let mut source = GatedSource::new(Vec::new());
        source.fail = true;
        let source = Arc::new(source);
        let cache = StorageCache::new(source.clone());

        let err = cache.lookup("example.com").await.unwrap_err();
        assert_eq!(err.domain, "example.com");
        assert_eq!(cache.stats().entries, 0);

        assert!(cache.lookup("example.com").await.is_err());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
