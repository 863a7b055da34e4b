//! Bundled default page records.

use log::error;

use crate::models::PageRecord;

const DEFAULT_PAGES_JSON: &str = include_str!("../../data/default_pages.json");

/// Parses the bundled default pages.
pub fn default_pages() -> Vec<PageRecord> {
    match serde_json::from_str(DEFAULT_PAGES_JSON) {
        Ok(records) => records,
        Err(e) => {
            error!("Bundled default pages are invalid: {e}");
            Vec::new()
        }
    }
}
