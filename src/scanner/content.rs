//! Pluggable in-page content signals.
//!
//! The scanner can read the visited page and ask a [`ContentMatcher`] for
//! extra records. Matching rules live entirely in the matcher.

use async_trait::async_trait;

use crate::error_handling::ScanError;
use crate::models::PageRecord;

/// Read access to the content of the page being scanned.
#[async_trait]
pub trait DomContent: Send + Sync {
    /// Returns the visible text of the page.
    async fn inner_text(&self) -> Result<String, ScanError>;
}

/// What a matcher knows about the page being scanned.
#[derive(Debug, Clone, Copy)]
pub struct ScanContext<'a> {
    pub domain: &'a str,
    pub main_domain: &'a str,
    pub url: &'a str,
    /// Records already found for the domain
    pub domain_records: &'a [PageRecord],
}

/// Finds additional records from page content.
#[async_trait]
pub trait ContentMatcher: Send + Sync {
    async fn match_content(
        &self,
        context: &ScanContext<'_>,
        dom: &dyn DomContent,
    ) -> Result<Vec<PageRecord>, ScanError>;
}
