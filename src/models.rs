use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A curated page known for a registrable domain.
///
/// `domain` is always the output of the domain resolver, never raw host input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub domain: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
}

impl PageRecord {
    /// Creates a record with no tags.
    pub fn new(
        domain: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            title: title.into(),
            url: url.into(),
            tags: BTreeSet::new(),
        }
    }
}

/// Pages found for one scan. Built once per scan and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageSearchResult {
    total_pages_found: usize,
    records: Vec<PageRecord>,
}

impl PageSearchResult {
    pub fn new(records: Vec<PageRecord>) -> Self {
        Self {
            total_pages_found: records.len(),
            records,
        }
    }

    pub fn total_pages_found(&self) -> usize {
        self.total_pages_found
    }

    pub fn records(&self) -> &[PageRecord] {
        &self.records
    }
}
