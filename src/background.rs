//! The long-lived background process.
//!
//! [`Background`] wires the preferences, pages database, cache, scanner and
//! notification boundary together and exposes the host-facing entry points:
//! install, incoming messages, page loads and badge updates.

use std::sync::Arc;

use log::{error, info};
use tokio::sync::oneshot;

use crate::cache::StorageCache;
use crate::database::PagesDatabase;
use crate::domain::DomainResolver;
use crate::error_handling::{ScanError, StorageError};
use crate::models::PageSearchResult;
use crate::notify::{ActionBadge, BrowserHost, MainMessage, NotificationDispatcher};
use crate::preferences::Preferences;
use crate::scanner::{ContentMatcher, ContentScanner, ScanOutcome, ScanParameters};
use crate::storage::StorageTiers;

/// Which branch [`Background::on_message`] took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBranch {
    /// The message carried badge text; the badge was updated
    BadgeText,
    /// Scanning is disabled; the status indicator was shown
    Disabled,
    /// The message carried a domain; a scan ran (or failed and was logged)
    Scanned(Option<ScanOutcome>),
    /// Nothing to do
    Ignored,
}

pub struct Background {
    tiers: StorageTiers,
    preferences: Arc<Preferences>,
    resolver: DomainResolver,
    pages: Arc<PagesDatabase>,
    cache: Arc<StorageCache>,
    scanner: ContentScanner,
    dispatcher: NotificationDispatcher,
    host: Arc<dyn BrowserHost>,
}

impl Background {
    /// Builds the background process and seeds the pages database.
    ///
    /// The pages database lives in the local tier.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the default pages cannot be seeded.
    pub async fn start(
        tiers: StorageTiers,
        preferences: Arc<Preferences>,
        host: Arc<dyn BrowserHost>,
        resolver: DomainResolver,
    ) -> Result<Self, StorageError> {
        let pages = Arc::new(PagesDatabase::new(Arc::clone(&tiers.local), resolver));
        Self::with_pages(tiers, preferences, host, resolver, pages).await
    }

    /// Same as [`Background::start`] over an already constructed database.
    pub async fn with_pages(
        tiers: StorageTiers,
        preferences: Arc<Preferences>,
        host: Arc<dyn BrowserHost>,
        resolver: DomainResolver,
        pages: Arc<PagesDatabase>,
    ) -> Result<Self, StorageError> {
        pages.init_default_pages().await?;

        let badge = Arc::new(ActionBadge::new(Arc::clone(&host)));
        let cache = Arc::new(StorageCache::new(pages.clone()));
        let scanner = ContentScanner::new(
            resolver,
            Arc::clone(&preferences),
            Arc::clone(&cache),
            Arc::clone(&badge),
        );
        let dispatcher = NotificationDispatcher::new(Arc::clone(&host), badge);

        Ok(Self {
            tiers,
            preferences,
            resolver,
            pages,
            cache,
            scanner,
            dispatcher,
            host,
        })
    }

    /// Lets `matcher` add records found in page content to every scan.
    pub fn with_content_matcher(self, matcher: Arc<dyn ContentMatcher>) -> Self {
        Self {
            scanner: self.scanner.with_content_matcher(matcher),
            ..self
        }
    }

    pub fn preferences(&self) -> &Arc<Preferences> {
        &self.preferences
    }

    pub fn resolver(&self) -> DomainResolver {
        self.resolver
    }

    pub fn pages(&self) -> &Arc<PagesDatabase> {
        &self.pages
    }

    pub fn cache(&self) -> &Arc<StorageCache> {
        &self.cache
    }

    pub fn scanner(&self) -> &ContentScanner {
        &self.scanner
    }

    pub fn badge(&self) -> &Arc<ActionBadge> {
        self.dispatcher.badge()
    }

    /// Shows `on` or `off` on the badge.
    pub fn indicate_status(&self) {
        self.badge().show_status(self.preferences.is_enabled.get());
    }

    /// Shows a scan result on the badge and, when pages were found, on the
    /// user's chosen channel.
    pub async fn indicate_pages(&self, result: &PageSearchResult) {
        self.dispatcher
            .indicate_pages(
                result,
                self.preferences.notification_preference.get(),
                self.preferences.is_enabled.get(),
            )
            .await;
    }

    /// Sets the badge text verbatim.
    pub fn on_badge_text_update(&self, text: &str) {
        self.badge().set_text(text);
    }

    /// Shows a generic notification.
    pub fn notify(&self, message: &str) {
        self.dispatcher.notify(message);
    }

    /// Handles one page load.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::InvalidDomain` if `raw_domain` has no registrable
    /// domain, or `ScanError::Lookup` if the pages cannot be loaded.
    pub async fn on_page_loaded(&self, raw_domain: &str, url: &str) -> Result<ScanOutcome, ScanError> {
        let resolution = self.resolver.require(raw_domain)?;
        let domain = resolution.registrable_domain.unwrap_or_default();
        info!("Domain: {domain}");

        let (tx, rx) = oneshot::channel();
        let params = ScanParameters {
            domain,
            main_domain: resolution.main_domain.unwrap_or_default(),
            url: url.to_string(),
            dom: self.host.page_content(),
            notify: Box::new(move |result| {
                let _ = tx.send(result);
            }),
        };

        let outcome = self.scanner.check_page_contents(params).await?;
        // The sender is gone unless the scan completed
        if let Ok(result) = rx.await {
            self.indicate_pages(&result).await;
        }
        Ok(outcome)
    }

    /// Loads preferences from the storage tiers. Later calls are no-ops.
    pub async fn init_preferences(&self) {
        self.preferences.init_defaults(&self.tiers).await;
    }

    /// Handles extension install: loads preferences and shows the status.
    pub async fn on_installed(&self) {
        info!("Domain pages extension installed");
        self.init_preferences().await;
        self.preferences.dump();
        self.indicate_status();
    }

    /// Handles a message from another part of the extension.
    ///
    /// Exactly one branch runs, in order: badge text, disabled, domain.
    /// Scan failures are logged here and never propagate.
    pub async fn on_message(&self, message: MainMessage) -> MessageBranch {
        self.init_preferences().await;
        self.preferences.dump();

        if let Some(text) = message.badge_text.as_deref().filter(|t| !t.is_empty()) {
            self.on_badge_text_update(text);
            return MessageBranch::BadgeText;
        }

        if !self.preferences.is_enabled.get() {
            self.indicate_status();
            return MessageBranch::Disabled;
        }

        match message.domain.as_deref().filter(|d| !d.is_empty()) {
            Some(domain) => {
                let url = message.url.as_deref().unwrap_or_default();
                match self.on_page_loaded(domain, url).await {
                    Ok(outcome) => MessageBranch::Scanned(Some(outcome)),
                    Err(e) => {
                        error!("Scan of {domain} failed: {e}");
                        MessageBranch::Scanned(None)
                    }
                }
            }
            None => MessageBranch::Ignored,
        }
    }
}
