//! Error handling.
//!
//! Errors are categorized by the stage that raises them:
//! - **Domain**: input with no registrable domain
//! - **Storage**: key-value tier reads and writes
//! - **Scan**: a single page scan (isolated to that page load)
//! - **Notify**: host notification requests

mod types;

// Re-export public API
pub use types::{
    DomainError, InitializationError, LookupError, NotifyError, ScanError, StorageError,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::sync::Arc;

    #[test]
    fn test_invalid_domain_message() {
        let err = DomainError::InvalidDomain("not a domain".to_string());
        assert_eq!(err.to_string(), "\"not a domain\" is not a valid domain");
    }

    #[test]
    fn test_lookup_error_keeps_source() {
        let err = LookupError {
            domain: "example.com".to_string(),
            source: Arc::new(StorageError::BackendError("disk gone".to_string())),
        };
        assert!(err.to_string().contains("example.com"));
        assert!(err.source().is_some());

        // Clones share the same underlying failure
        let cloned = err.clone();
        assert!(Arc::ptr_eq(&err.source, &cloned.source));
    }

    #[test]
    fn test_scan_error_is_transparent_for_domain_errors() {
        let err: ScanError = DomainError::InvalidDomain("1.2.3.4".to_string()).into();
        assert_eq!(err.to_string(), "\"1.2.3.4\" is not a valid domain");
    }
}
