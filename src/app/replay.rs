//! Replaying recorded navigations through the background process.

use std::time::Instant;

use log::{debug, info};

use super::url::navigation_message;
use crate::background::{Background, MessageBranch};
use crate::scanner::ScanOutcome;

/// What happened over one replay.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReplaySummary {
    /// Non-blank input lines
    pub lines: usize,
    /// Lines that were not a usable web URL
    pub skipped_urls: usize,
    /// Scans that ran to completion
    pub scanned: usize,
    /// Loads on an excluded domain
    pub excluded: usize,
    /// Loads not scanned because scanning is disabled
    pub disabled: usize,
    /// Loads whose host did not resolve or whose lookup failed
    pub failed: usize,
    /// Completed scans that found at least one page
    pub pages_hit: usize,
    /// Pages found across every scan
    pub pages_found: usize,
    /// Wall time in seconds
    pub elapsed_seconds: f64,
}

/// Sends one page-load message per line to `background`, in order.
pub async fn replay_navigations<I, S>(background: &Background, lines: I) -> ReplaySummary
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let started = Instant::now();
    let mut summary = ReplaySummary::default();

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        summary.lines += 1;

        let Some(message) = navigation_message(line) else {
            summary.skipped_urls += 1;
            continue;
        };

        let branch = background.on_message(message).await;
        debug!("{line} -> {branch:?}");
        summary.record(&branch);
    }

    summary.elapsed_seconds = started.elapsed().as_secs_f64();
    info!(
        "Replayed {} navigation{} in {:.2}s",
        summary.lines,
        if summary.lines == 1 { "" } else { "s" },
        summary.elapsed_seconds
    );
    summary
}

impl ReplaySummary {
    fn record(&mut self, branch: &MessageBranch) {
        match branch {
            MessageBranch::Scanned(Some(ScanOutcome::Completed { total_pages_found })) => {
                self.scanned += 1;
                self.pages_found += total_pages_found;
                if *total_pages_found > 0 {
                    self.pages_hit += 1;
                }
            }
            MessageBranch::Scanned(Some(ScanOutcome::Excluded)) => self.excluded += 1,
            MessageBranch::Scanned(Some(ScanOutcome::Skipped)) => self.skipped_urls += 1,
            MessageBranch::Scanned(None) => self.failed += 1,
            MessageBranch::Disabled => self.disabled += 1,
            MessageBranch::BadgeText | MessageBranch::Ignored => {}
        }
    }
}
