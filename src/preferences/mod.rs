//! User preferences.
//!
//! Each preference is a [`PreferenceValue`] living in exactly one storage tier:
//! - `isEnabled` (sync tier, default `true`)
//! - `notificationPreference` (sync tier, default `notify`)
//! - `domainExclusions` (local tier, default empty)
//!
//! Values must be initialized with [`Preferences::init_defaults`] once per
//! process before they reflect stored state.

mod exclusions;
mod value;

use std::sync::{Arc, LazyLock};

use log::{debug, info};

use crate::config::{PREF_DOMAIN_EXCLUSIONS, PREF_IS_ENABLED, PREF_NOTIFICATION};
use crate::error_handling::StorageError;
use crate::notify::MessageKind;
use crate::storage::{StorageTier, StorageTiers};

pub use exclusions::ExclusionList;
pub use value::{Listener, PreferenceValue};

static SHARED: LazyLock<Arc<Preferences>> = LazyLock::new(|| Arc::new(Preferences::new()));

/// The full set of user preferences.
pub struct Preferences {
    /// Global on/off switch for scanning
    pub is_enabled: PreferenceValue<bool>,
    /// Domains never scanned
    pub domain_exclusions: ExclusionList,
    /// Channel used to present found pages
    pub notification_preference: PreferenceValue<MessageKind>,
}

impl Preferences {
    /// Creates a fresh, uninitialized set of preferences.
    pub fn new() -> Self {
        Self {
            is_enabled: PreferenceValue::new(PREF_IS_ENABLED, StorageTier::Sync, true),
            domain_exclusions: ExclusionList::new(PREF_DOMAIN_EXCLUSIONS, StorageTier::Local),
            notification_preference: PreferenceValue::new(
                PREF_NOTIFICATION,
                StorageTier::Sync,
                MessageKind::default(),
            ),
        }
    }

    /// Returns the process-wide preferences, created on first access.
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED)
    }

    /// Initializes every value from its tier. Later calls are no-ops.
    pub async fn init_defaults(&self, tiers: &StorageTiers) {
        futures::join!(
            self.is_enabled.init_defaults(tiers),
            self.domain_exclusions.init_defaults(tiers),
            self.notification_preference.init_defaults(tiers),
        );
    }

    /// Returns true once every value has been initialized.
    pub fn is_ready(&self) -> bool {
        self.is_enabled.is_ready()
            && self.domain_exclusions.is_ready()
            && self.notification_preference.is_ready()
    }

    /// Writes every value to its tier, waiting for each write.
    pub async fn save(&self) -> Result<(), StorageError> {
        let (enabled, exclusions, channel) = futures::join!(
            self.is_enabled.save(),
            self.domain_exclusions.save(),
            self.notification_preference.save(),
        );
        enabled.and(exclusions).and(channel)
    }

    /// Logs every value.
    pub fn dump(&self) {
        info!(
            "Preferences: {}={}, {}={:?}, {}={}",
            self.is_enabled.name(),
            self.is_enabled.get(),
            self.domain_exclusions.name(),
            self.domain_exclusions.get(),
            self.notification_preference.name(),
            self.notification_preference.get(),
        );
        debug!(
            "Preference tiers: {}={}, {}={}, {}={}",
            self.is_enabled.name(),
            self.is_enabled.tier(),
            self.domain_exclusions.name(),
            self.domain_exclusions.tier(),
            self.notification_preference.name(),
            self.notification_preference.tier(),
        );
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self::new()
    }
}
