//! End-of-run statistics.

use log::info;

use super::replay::ReplaySummary;
use crate::cache::CacheStats;

/// Logs the replay summary and cache counters.
pub fn print_replay_statistics(summary: &ReplaySummary, cache: &CacheStats) {
    info!(
        "✅ Scanned {} page load{} ({} with pages, {} pages total) in {:.1}s",
        summary.scanned,
        if summary.scanned == 1 { "" } else { "s" },
        summary.pages_hit,
        summary.pages_found,
        summary.elapsed_seconds
    );

    let not_scanned = summary.excluded + summary.disabled + summary.skipped_urls + summary.failed;
    if not_scanned > 0 {
        info!("Not scanned ({not_scanned} total):");
        for (label, count) in [
            ("excluded", summary.excluded),
            ("disabled", summary.disabled),
            ("unusable URL", summary.skipped_urls),
            ("failed", summary.failed),
        ] {
            if count > 0 {
                info!("   {label}: {count}");
            }
        }
    }

    info!(
        "Cache: {} hits, {} misses, {} collapsed, {} entries",
        cache.hits, cache.misses, cache.collapsed, cache.entries
    );
}
