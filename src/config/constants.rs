//! Configuration constants.
//!
//! Storage keys, defaults, and limits shared across modules.

/// Default SQLite database path holding both storage tiers
pub const DB_PATH: &str = "./domain_pages.db";
/// Connections in the SQLite pool
pub const DB_MAX_CONNECTIONS: u32 = 4;
/// Seconds a connection waits on a locked database before failing
pub const DB_BUSY_TIMEOUT_SECS: u64 = 5;

/// Maximum navigation line length accepted when replaying events
pub const MAX_URL_LENGTH: usize = 2048;

// Storage layout
// Every persisted value lives under a namespaced top-level key so preferences
// and the pages database never collide within a tier.
/// Key prefix for preference values
pub const PREFERENCES_KEY_PREFIX: &str = "preferences.";
/// Key holding the pages database records (local tier)
pub const PAGES_DB_KEY: &str = "pages_db.records";

// Preference names
pub const PREF_IS_ENABLED: &str = "isEnabled";
pub const PREF_DOMAIN_EXCLUSIONS: &str = "domainExclusions";
pub const PREF_NOTIFICATION: &str = "notificationPreference";

// Badge texts
pub const BADGE_ENABLED: &str = "on";
pub const BADGE_DISABLED: &str = "off";

/// Title used for generic notifications sent through `Background::notify`
pub const GENERIC_NOTIFICATION_TITLE: &str = "Hey";

/// Notification id reused for generic notifications, so a new one replaces the last
pub const GENERIC_NOTIFICATION_ID: &str = "domain-pages-generic";
