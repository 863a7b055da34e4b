//! Channel selection and dispatch.

use std::sync::Arc;

use log::{error, info};

use super::badge::ActionBadge;
use super::host::BrowserHost;
use super::message::{Message, MessageKind};
use crate::config::{GENERIC_NOTIFICATION_ID, GENERIC_NOTIFICATION_TITLE};
use crate::error_handling::NotifyError;
use crate::models::PageSearchResult;

/// Routes typed messages to the host capability behind each channel.
#[derive(Clone)]
pub struct MessageRouter {
    host: Arc<dyn BrowserHost>,
}

impl MessageRouter {
    pub fn new(host: Arc<dyn BrowserHost>) -> Self {
        Self { host }
    }

    /// Handles one message.
    pub async fn dispatch(&self, message: Message) -> Result<(), NotifyError> {
        match message {
            Message::Log { message } => {
                info!("{message}");
                Ok(())
            }
            Message::Notify { title, message } => {
                self.host.create_notification(None, &title, &message)
            }
            Message::Page {
                title,
                message,
                tab_id,
            } => self.host.show_page_banner(tab_id, &title, &message).await,
        }
    }
}

/// Title and body announcing `total` found pages.
pub fn found_pages_text(total: usize) -> (String, String) {
    let plurality = if total == 1 { "" } else { "s" };
    (
        format!("Page{plurality} Found"),
        format!("Found {total} page{plurality}."),
    )
}

/// Presents scan results: badge count plus the user's chosen channel.
pub struct NotificationDispatcher {
    router: MessageRouter,
    host: Arc<dyn BrowserHost>,
    badge: Arc<ActionBadge>,
}

impl NotificationDispatcher {
    pub fn new(host: Arc<dyn BrowserHost>, badge: Arc<ActionBadge>) -> Self {
        Self {
            router: MessageRouter::new(Arc::clone(&host)),
            host,
            badge,
        }
    }

    pub fn badge(&self) -> &Arc<ActionBadge> {
        &self.badge
    }

    /// Sends `title`/`message` on `channel`.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::NoActiveTab` for the page channel when no tab is
    /// active, or whatever the host reports.
    pub async fn present(
        &self,
        channel: MessageKind,
        title: String,
        message: String,
    ) -> Result<(), NotifyError> {
        let message = match channel {
            MessageKind::Log => Message::Log {
                message: format!("{title}: {message}"),
            },
            MessageKind::Notify => Message::Notify { title, message },
            MessageKind::Page => {
                let tab_id = self.host.active_tab().await.ok_or(NotifyError::NoActiveTab)?;
                Message::Page {
                    title,
                    message,
                    tab_id,
                }
            }
        };
        self.router.dispatch(message).await
    }

    /// Shows the outcome of one scan.
    ///
    /// Zero pages reverts the badge to the enabled/disabled indicator; any
    /// pages set the badge count and notify on `channel`. Channel failures are
    /// logged.
    pub async fn indicate_pages(
        &self,
        result: &PageSearchResult,
        channel: MessageKind,
        enabled: bool,
    ) {
        let total = result.total_pages_found();
        if total == 0 {
            self.badge.show_status(enabled);
            return;
        }

        self.badge.show_count(total);
        let (title, message) = found_pages_text(total);
        if let Err(e) = self.present(channel, title, message).await {
            error!("Failed to present {total} found pages via {channel}: {e}");
        }
    }

    /// Shows a generic operating system notification.
    pub fn notify(&self, message: &str) {
        if let Err(e) = self.host.create_notification(
            Some(GENERIC_NOTIFICATION_ID),
            GENERIC_NOTIFICATION_TITLE,
            message,
        ) {
            error!("Failed to show notification: {e}");
        }
    }
}
