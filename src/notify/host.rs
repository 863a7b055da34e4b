//! The host browser boundary.
//!
//! The badge, notification and tab-scripting APIs belong to the host; this
//! crate only calls them through [`BrowserHost`].

use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use crate::error_handling::NotifyError;
use crate::scanner::DomContent;

/// Host identifier of a browser tab.
pub type TabId = i64;

/// Host capabilities used to present results.
#[async_trait]
pub trait BrowserHost: Send + Sync {
    /// Sets the action badge text. Only [`super::ActionBadge`] should call this.
    fn set_badge_text(&self, text: &str);

    /// Shows an operating system notification.
    fn create_notification(
        &self,
        id: Option<&str>,
        title: &str,
        message: &str,
    ) -> Result<(), NotifyError>;

    /// Returns the active tab of the current window, if any.
    async fn active_tab(&self) -> Option<TabId>;

    /// Injects a dismissible banner into `tab`.
    async fn show_page_banner(
        &self,
        tab: TabId,
        title: &str,
        message: &str,
    ) -> Result<(), NotifyError>;

    /// Returns a handle for reading the current page's content, if available.
    fn page_content(&self) -> Option<Arc<dyn DomContent>> {
        None
    }
}

/// Host that renders every request to the log sink.
///
/// Used when running outside a browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHost;

#[async_trait]
impl BrowserHost for LoggingHost {
    fn set_badge_text(&self, text: &str) {
        info!("[badge] {text}");
    }

    fn create_notification(
        &self,
        id: Option<&str>,
        title: &str,
        message: &str,
    ) -> Result<(), NotifyError> {
        info!("[notification {}] {title}: {message}", id.unwrap_or("-"));
        Ok(())
    }

    async fn active_tab(&self) -> Option<TabId> {
        Some(0)
    }

    async fn show_page_banner(
        &self,
        tab: TabId,
        title: &str,
        message: &str,
    ) -> Result<(), NotifyError> {
        info!("[tab {tab} banner] {title}: {message}");
        Ok(())
    }
}
