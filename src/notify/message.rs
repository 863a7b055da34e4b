//! Message types exchanged with the background process.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use super::host::TabId;

/// Names of the typed message channels.
///
/// Also the value type of the notification preference: the user picks which
/// channel found pages are reported through.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MessageKind {
    /// Write to the log sink
    Log,
    /// Operating system notification
    #[default]
    Notify,
    /// Banner injected into the active page
    Page,
}

/// A typed request on one of the message channels. Every handler resolves to `()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum Message {
    /// `log` channel
    Log { message: String },
    /// `notify` channel
    Notify { title: String, message: String },
    /// `page` channel
    Page {
        title: String,
        message: String,
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
}

impl Message {
    /// Returns the channel this message travels on.
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Log { .. } => MessageKind::Log,
            Message::Notify { .. } => MessageKind::Notify,
            Message::Page { .. } => MessageKind::Page,
        }
    }
}

/// Envelope sent from the page context to the background process.
///
/// Dispatch precedence: `badge_text`, then the global enable flag, then `domain`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl MainMessage {
    /// A page-load message for `domain` at `url`.
    pub fn page_loaded(domain: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// A manual badge text update.
    pub fn badge(text: impl Into<String>) -> Self {
        Self {
            badge_text: Some(text.into()),
            ..Default::default()
        }
    }
}
