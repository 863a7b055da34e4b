//! The action badge.

use std::sync::{Arc, Mutex, PoisonError};

use log::debug;

use super::host::BrowserHost;
use crate::config::{BADGE_DISABLED, BADGE_ENABLED};

/// Owner of the process-wide badge text.
///
/// Every badge write goes through [`ActionBadge::set_text`]. There is no
/// per-tab state: the last write wins.
pub struct ActionBadge {
    host: Arc<dyn BrowserHost>,
    text: Mutex<Option<String>>,
}

impl ActionBadge {
    pub fn new(host: Arc<dyn BrowserHost>) -> Self {
        Self {
            host,
            text: Mutex::new(None),
        }
    }

    /// Writes `text` to the host badge.
    pub fn set_text(&self, text: &str) {
        let mut current = self.text.lock().unwrap_or_else(PoisonError::into_inner);
        debug!("Badge text: {:?} -> {:?}", current.as_deref(), text);
        // Write to the host while holding the lock so host order matches ours
        self.host.set_badge_text(text);
        *current = Some(text.to_string());
    }

    /// Shows the plain enabled/disabled indicator.
    pub fn show_status(&self, enabled: bool) {
        self.set_text(if enabled { BADGE_ENABLED } else { BADGE_DISABLED });
    }

    /// Shows a page count.
    pub fn show_count(&self, count: usize) {
        self.set_text(&count.to_string());
    }

    /// Returns the last text written, if any.
    pub fn text(&self) -> Option<String> {
        self.text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
