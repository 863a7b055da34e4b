//! Notification boundary.
//!
//! This module provides:
//! - The typed message map (`log`, `notify`, `page`) and the page-context envelope
//! - The [`BrowserHost`] trait over the host's badge/notification/tab APIs
//! - [`ActionBadge`], the single owner of the badge text
//! - [`NotificationDispatcher`], which renders scan results on the chosen channel

mod badge;
mod dispatcher;
mod host;
mod message;

// Re-export public API
pub use badge::ActionBadge;
pub use dispatcher::{found_pages_text, MessageRouter, NotificationDispatcher};
pub use host::{BrowserHost, LoggingHost, TabId};
pub use message::{MainMessage, Message, MessageKind};
