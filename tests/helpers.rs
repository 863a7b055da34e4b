// Shared test helpers: recording host, counting storage and a ready-made
// background process over in-memory tiers.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use domain_pages::config::PAGES_DB_KEY;
use domain_pages::error_handling::{NotifyError, StorageError};
use domain_pages::notify::{BrowserHost, TabId};
use domain_pages::preferences::Preferences;
use domain_pages::storage::{MemoryArea, StorageArea, StorageTier, StorageTiers};
use domain_pages::{Background, DomainResolver, PageRecord};

/// Host that records every call instead of rendering it.
#[derive(Default)]
pub struct RecordingHost {
    pub badge: Mutex<Vec<String>>,
    pub notifications: Mutex<Vec<(Option<String>, String, String)>>,
    pub banners: Mutex<Vec<(TabId, String, String)>>,
    pub no_active_tab: bool,
}

#[allow(dead_code)] // Not every test file uses every accessor
impl RecordingHost {
    pub fn badge_writes(&self) -> Vec<String> {
        self.badge.lock().unwrap().clone()
    }

    pub fn last_badge(&self) -> Option<String> {
        self.badge.lock().unwrap().last().cloned()
    }

    pub fn notifications(&self) -> Vec<(Option<String>, String, String)> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn banners(&self) -> Vec<(TabId, String, String)> {
        self.banners.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowserHost for RecordingHost {
    fn set_badge_text(&self, text: &str) {
        self.badge.lock().unwrap().push(text.to_string());
    }

    fn create_notification(
        &self,
        id: Option<&str>,
        title: &str,
        message: &str,
    ) -> Result<(), NotifyError> {
        self.notifications.lock().unwrap().push((
            id.map(str::to_string),
            title.to_string(),
            message.to_string(),
        ));
        Ok(())
    }

    async fn active_tab(&self) -> Option<TabId> {
        if self.no_active_tab {
            None
        } else {
            Some(7)
        }
    }

    async fn show_page_banner(
        &self,
        tab: TabId,
        title: &str,
        message: &str,
    ) -> Result<(), NotifyError> {
        self.banners
            .lock()
            .unwrap()
            .push((tab, title.to_string(), message.to_string()));
        Ok(())
    }
}

/// Memory area that counts reads of the pages database key. While held,
/// those reads wait until [`CountingArea::release`].
pub struct CountingArea {
    inner: MemoryArea,
    pub page_reads: AtomicUsize,
    held: AtomicBool,
    gate: Notify,
}

#[allow(dead_code)]
impl CountingArea {
    pub fn new(tier: StorageTier) -> Self {
        Self {
            inner: MemoryArea::new(tier),
            page_reads: AtomicUsize::new(0),
            held: AtomicBool::new(false),
            gate: Notify::new(),
        }
    }

    pub fn page_reads(&self) -> usize {
        self.page_reads.load(Ordering::SeqCst)
    }

    /// Makes the next pages database reads wait for `release`.
    pub fn hold(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    /// Lets held and future reads through.
    pub fn release(&self) {
        self.held.store(false, Ordering::SeqCst);
        self.gate.notify_waiters();
        // A read counted but not yet waiting picks this permit up
        self.gate.notify_one();
    }
}

#[async_trait]
impl StorageArea for CountingArea {
    fn tier(&self) -> StorageTier {
        self.inner.tier()
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        if key == PAGES_DB_KEY {
            self.page_reads.fetch_add(1, Ordering::SeqCst);
            if self.held.load(Ordering::SeqCst) {
                self.gate.notified().await;
            }
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.inner.keys().await
    }
}

/// Everything a pipeline test needs to observe.
#[allow(dead_code)]
pub struct Harness {
    pub background: Background,
    pub host: Arc<RecordingHost>,
    pub local: Arc<CountingArea>,
    pub tiers: StorageTiers,
}

/// Records for `example.com` (one) and `example.net` (two).
#[allow(dead_code)]
pub fn sample_pages() -> Vec<PageRecord> {
    vec![
        PageRecord::new("example.com", "Example Co", "https://pages.example.org/example-co"),
        PageRecord::new("example.net", "Net One", "https://pages.example.org/net-one"),
        PageRecord::new("example.net", "Net Two", "https://pages.example.org/net-two"),
    ]
}

/// Starts a background process over fresh in-memory tiers seeded with
/// [`sample_pages`]; `host` receives every badge and notification call.
#[allow(dead_code)]
pub async fn harness(host: RecordingHost) -> Harness {
    let host = Arc::new(host);
    let local = Arc::new(CountingArea::new(StorageTier::Local));
    let tiers = StorageTiers::new(
        Arc::new(MemoryArea::new(StorageTier::Sync)),
        local.clone(),
    );

    let resolver = DomainResolver::default();
    let pages = Arc::new(domain_pages::database::PagesDatabase::with_defaults(
        local.clone(),
        resolver,
        sample_pages(),
    ));
    let background = Background::with_pages(
        tiers.clone(),
        Arc::new(Preferences::new()),
        host.clone(),
        resolver,
        pages,
    )
    .await
    .expect("Failed to start background");

    // Seeding reads the pages key once; tests count from zero
    local.page_reads.store(0, Ordering::SeqCst);

    Harness {
        background,
        host,
        local,
        tiers,
    }
}
