//! The user's domain exclusion list.

use std::ops::Deref;

use log::warn;

use super::value::PreferenceValue;
use crate::domain::DomainResolver;
use crate::error_handling::DomainError;
use crate::storage::StorageTier;

/// Ordered list of excluded domains, persisted as a preference.
///
/// Derefs to the underlying [`PreferenceValue`] for `get`, `set`, listeners and
/// initialization.
pub struct ExclusionList {
    value: PreferenceValue<Vec<String>>,
}

impl ExclusionList {
    pub fn new(name: &'static str, tier: StorageTier) -> Self {
        Self {
            value: PreferenceValue::new(name, tier, Vec::new()),
        }
    }

    /// Appends `domain` as given. Duplicates are allowed.
    pub fn add(&self, domain: impl Into<String>) {
        let mut entries = self.value.get();
        entries.push(domain.into());
        self.value.set(entries);
    }

    /// Resolves `input` and appends its registrable domain.
    ///
    /// Entries are normalized here, when they are written, so scans can trust
    /// the stored form. Returns the stored domain.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDomain` if `input` has no registrable domain.
    pub fn add_domain(&self, resolver: &DomainResolver, input: &str) -> Result<String, DomainError> {
        let domain = resolver
            .registrable_domain(input)
            .ok_or_else(|| DomainError::InvalidDomain(input.to_string()))?;
        self.add(domain.clone());
        Ok(domain)
    }

    /// Removes the entry at `index`. Out-of-range indexes are logged and ignored.
    ///
    /// Returns the removed entry.
    pub fn delete_at(&self, index: usize) -> Option<String> {
        let mut entries = self.value.get();
        if index >= entries.len() {
            warn!(
                "Cannot remove exclusion at index {} (list has {} entries)",
                index,
                entries.len()
            );
            return None;
        }
        let removed = entries.remove(index);
        self.value.set(entries);
        Some(removed)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.value.set(Vec::new());
    }
}

impl Deref for ExclusionList {
    type Target = PreferenceValue<Vec<String>>;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn list() -> ExclusionList {
        ExclusionList::new("domainExclusions", StorageTier::Local)
    }

    #[tokio::test]
    async fn test_add_preserves_order_and_duplicates() {
        let exclusions = list();
        exclusions.add("b.com");
        exclusions.add("a.com");
        exclusions.add("b.com");
        assert_eq!(exclusions.get(), vec!["b.com", "a.com", "b.com"]);
    }

    #[tokio::test]
    async fn test_add_domain_normalizes() {
        let exclusions = list();
        let resolver = DomainResolver::default();
        let stored = exclusions
            .add_domain(&resolver, "https://News.Example.com/today")
            .unwrap();
        assert_eq!(stored, "example.com");
        assert_eq!(exclusions.get(), vec!["example.com"]);
    }

    #[tokio::test]
    async fn test_add_domain_rejects_invalid_input() {
        let exclusions = list();
        let resolver = DomainResolver::default();
        let err = exclusions.add_domain(&resolver, "nonsense").unwrap_err();
        assert_eq!(err.to_string(), "\"nonsense\" is not a valid domain");
        assert!(exclusions.get().is_empty());
    }

    #[tokio::test]
    async fn test_delete_at_bounds_checked() {
        let exclusions = list();
        exclusions.add("a.com");
        exclusions.add("b.com");

        assert_eq!(exclusions.delete_at(5), None);
        assert_eq!(exclusions.get().len(), 2);

        assert_eq!(exclusions.delete_at(0).as_deref(), Some("a.com"));
        assert_eq!(exclusions.get(), vec!["b.com"]);
    }

    #[tokio::test]
    async fn test_clear_and_replace_notify_listeners() {
        let exclusions = list();
        let seen: Arc<Mutex<Vec<Vec<String>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        exclusions.add_listener("options", move |entries: &Vec<String>| {
            sink.lock().unwrap().push(entries.clone());
        });

        exclusions.add("a.com");
        exclusions.set(vec!["x.com".to_string(), "y.com".to_string()]);
        exclusions.clear();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], vec!["a.com"]);
        assert_eq!(seen[1], vec!["x.com", "y.com"]);
        assert!(seen[2].is_empty());
    }
}
