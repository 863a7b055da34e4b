//! Main application modules.
//!
//! This module provides the pieces the binary uses to drive the background
//! process from recorded navigations: URL-to-message conversion, replay, and
//! end-of-run statistics.

pub mod replay;
pub mod statistics;
pub mod url;

// Re-export public API
pub use replay::{replay_navigations, ReplaySummary};
pub use statistics::print_replay_statistics;
pub use url::navigation_message;
