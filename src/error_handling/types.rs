//! Error type definitions.
//!
//! This module defines all error types used throughout the pipeline.

use std::sync::Arc;

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error opening or preparing the storage tiers.
    #[error("Storage initialization error: {0}")]
    StorageError(#[from] StorageError),
}

/// Error raised when a host or URL has no registrable domain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The input could not be resolved to a registrable domain.
    #[error("\"{0}\" is not a valid domain")]
    InvalidDomain(String),
}

/// Error types for key-value storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// A stored value could not be (de)serialized.
    #[error("Serialization error for key '{key}': {source}")]
    SerializationError {
        /// Storage key being read or written
        key: String,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },

    /// Any other failure reported by a storage backend.
    #[error("Storage backend error: {0}")]
    BackendError(String),
}

/// A failed page lookup, shared by every caller waiting on the same load.
#[derive(Error, Debug, Clone)]
#[error("Page lookup failed for '{domain}': {source}")]
pub struct LookupError {
    /// Registrable domain whose load failed
    pub domain: String,
    /// Storage failure behind the lookup
    #[source]
    pub source: Arc<StorageError>,
}

/// Error types for a single page scan.
///
/// A scan error aborts that page load only; it is caught and logged where
/// messages are dispatched.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The page host did not resolve to a registrable domain.
    #[error(transparent)]
    InvalidDomain(#[from] DomainError),

    /// The pages cache could not load records for the domain.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Reading in-page content failed.
    #[error("Page content error: {0}")]
    Content(String),
}

/// Error types for presenting a notification through the host.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The host rejected or failed the request.
    #[error("Host notification error: {0}")]
    Host(String),

    /// An in-page notification was requested but no tab is active.
    #[error("No active tab to show the page notification in")]
    NoActiveTab,
}
