//! Turning navigated URLs into page-load messages.

use log::warn;

use crate::config::MAX_URL_LENGTH;
use crate::notify::MainMessage;

/// Builds the page-load message for one navigated URL.
///
/// Adds `https://` when the input has no scheme, then requires an http(s)
/// URL with a host. The raw host goes into `domain`; resolving it is the
/// background's job. Overlong, unparseable and non-web URLs are logged and
/// skipped.
pub fn navigation_message(url: &str) -> Option<MainMessage> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    if url.len() > MAX_URL_LENGTH {
        warn!(
            "Skipping URL exceeding maximum length ({} > {}): {}...",
            url.len(),
            MAX_URL_LENGTH,
            truncate(url)
        );
        return None;
    }

    let normalized = if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    };

    let parsed = match url::Url::parse(&normalized) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Skipping invalid URL {url}: {e}");
            return None;
        }
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        warn!("Skipping unsupported scheme for URL: {url}");
        return None;
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Some(MainMessage::page_loaded(host, normalized.as_str())),
        _ => {
            warn!("Skipping URL without a host: {url}");
            None
        }
    }
}

fn truncate(url: &str) -> &str {
    let end = (0..=50.min(url.len()))
        .rev()
        .find(|&i| url.is_char_boundary(i))
        .unwrap_or(0);
    &url[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adds_https_scheme() {
        let message = navigation_message("sub.example.com/path").unwrap();
        assert_eq!(message.domain.as_deref(), Some("sub.example.com"));
        assert_eq!(message.url.as_deref(), Some("https://sub.example.com/path"));
        assert!(message.badge_text.is_none());
    }

    #[test]
    fn test_preserves_http() {
        let message = navigation_message("http://example.com:8080/").unwrap();
        assert_eq!(message.url.as_deref(), Some("http://example.com:8080/"));
        assert_eq!(message.domain.as_deref(), Some("example.com"));
    }

    #[test]
    fn test_skips_blank_lines() {
        assert!(navigation_message("").is_none());
        assert!(navigation_message("   ").is_none());
    }

    #[test]
    fn test_rejects_unsupported_scheme() {
        assert!(navigation_message("ftp://example.com/file").is_none());
        assert!(navigation_message("file:///etc/hosts").is_none());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(navigation_message("not a url at all!!!").is_none());
        assert!(navigation_message("://example.com").is_none());
    }

    #[test]
    fn test_ip_hosts_pass_through() {
        // Resolution rejects them later; here they are still well-formed URLs
        let message = navigation_message("http://192.168.1.1/admin").unwrap();
        assert_eq!(message.domain.as_deref(), Some("192.168.1.1"));
    }

    #[test]
    fn test_length_limit() {
        let at_limit = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH - 20));
        assert_eq!(at_limit.len(), MAX_URL_LENGTH);
        assert!(navigation_message(&at_limit).is_some());

        let too_long = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(navigation_message(&too_long).is_none());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let url = "é".repeat(40);
        assert!(truncate(&url).len() <= 50);
    }
}
