//! Page scanning.
//!
//! One call to [`ContentScanner::check_page_contents`] handles one page load:
//!
//! 1. Skip when the domain is empty
//! 2. Skip (and revert the badge) when the domain is excluded
//! 3. Look the domain up through the cache, then optionally add records found
//!    by a pluggable [`ContentMatcher`] reading the page
//! 4. Build a [`PageSearchResult`]
//! 5. Call `notify` exactly once, even when nothing was found

mod content;

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::cache::StorageCache;
use crate::domain::DomainResolver;
use crate::error_handling::ScanError;
use crate::models::{PageRecord, PageSearchResult};
use crate::notify::ActionBadge;
use crate::preferences::Preferences;

pub use content::{ContentMatcher, DomContent, ScanContext};

/// Callback receiving the result of a scan.
pub type NotifyFn = Box<dyn FnOnce(PageSearchResult) + Send>;

/// Inputs for one scan.
pub struct ScanParameters {
    /// Registrable domain, already resolved
    pub domain: String,
    /// Registrable domain without its suffix
    pub main_domain: String,
    /// Full page URL
    pub url: String,
    /// Handle for reading the page, when the host offers one
    pub dom: Option<Arc<dyn DomContent>>,
    /// Receives the result
    pub notify: NotifyFn,
}

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Nothing to scan (empty domain)
    Skipped,
    /// Domain is on the exclusion list; no lookup, no notify
    Excluded,
    /// `notify` was called with this many pages
    Completed { total_pages_found: usize },
}

/// Runs scans against the cache, honoring the exclusion list.
pub struct ContentScanner {
    resolver: DomainResolver,
    preferences: Arc<Preferences>,
    cache: Arc<StorageCache>,
    badge: Arc<ActionBadge>,
    matcher: Option<Arc<dyn ContentMatcher>>,
}

impl ContentScanner {
    pub fn new(
        resolver: DomainResolver,
        preferences: Arc<Preferences>,
        cache: Arc<StorageCache>,
        badge: Arc<ActionBadge>,
    ) -> Self {
        Self {
            resolver,
            preferences,
            cache,
            badge,
            matcher: None,
        }
    }

    /// Adds a matcher that can contribute records from page content.
    pub fn with_content_matcher(mut self, matcher: Arc<dyn ContentMatcher>) -> Self {
        self.matcher = Some(matcher);
        self
    }

    /// Returns true if some exclusion entry resolves to `domain`.
    ///
    /// Entries are normalized when added, but older stored entries may not be,
    /// so each one is resolved again. Entries that do not resolve are logged
    /// and skipped; they never match.
    pub fn check_domain_is_excluded(&self, domain: &str) -> bool {
        let domain = domain.to_ascii_lowercase();
        self.preferences
            .domain_exclusions
            .get()
            .iter()
            .any(|excluded| match self.resolver.registrable_domain(excluded) {
                Some(resolved) => resolved == domain,
                None => {
                    warn!("Invalid domain in exclusions: {excluded}");
                    false
                }
            })
    }

    /// Scans one page load. See the module docs for the exact steps.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::Lookup` when the cache cannot load the domain; in
    /// that case `notify` is not called.
    pub async fn check_page_contents(
        &self,
        params: ScanParameters,
    ) -> Result<ScanOutcome, ScanError> {
        let ScanParameters {
            domain,
            main_domain,
            url,
            dom,
            notify,
        } = params;

        if domain.trim().is_empty() {
            info!("No domain to scan for {url}");
            return Ok(ScanOutcome::Skipped);
        }
        let domain = domain.to_ascii_lowercase();

        if self.check_domain_is_excluded(&domain) {
            info!("Domain {domain} skipped, was excluded");
            self.badge.show_status(self.preferences.is_enabled.get());
            return Ok(ScanOutcome::Excluded);
        }

        let cached = self.cache.lookup(&domain).await?;
        let mut records: Vec<PageRecord> = cached.to_vec();
        debug!("{} cached pages for {domain}", records.len());

        if let (Some(matcher), Some(dom)) = (&self.matcher, &dom) {
            let context = ScanContext {
                domain: &domain,
                main_domain: &main_domain,
                url: &url,
                domain_records: &cached,
            };
            match matcher.match_content(&context, dom.as_ref()).await {
                Ok(found) => merge_records(&mut records, found),
                Err(e) => warn!("Content matching failed for {url}: {e}"),
            }
        }

        let result = PageSearchResult::new(records);
        let total_pages_found = result.total_pages_found();
        info!("Found {total_pages_found} pages for {domain}");
        notify(result);

        Ok(ScanOutcome::Completed { total_pages_found })
    }
}

/// Appends `found` to `records`, skipping URLs already present.
fn merge_records(records: &mut Vec<PageRecord>, found: Vec<PageRecord>) {
    let mut seen: HashSet<String> = records.iter().map(|r| r.url.clone()).collect();
    for record in found {
        if seen.insert(record.url.clone()) {
            records.push(record);
        }
    }
}
