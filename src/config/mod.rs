//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (storage keys, defaults, limits)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{
    Command, Config, ExcludeAction, ExcludeArgs, LogFormat, LogLevel, Opt, PagesAction,
    PagesArgs,
};
