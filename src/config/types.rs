//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::constants::DB_PATH;
use crate::notify::MessageKind;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use domain_pages::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     db_path: PathBuf::from("./pages.db"),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite file backing both storage tiers
    pub db_path: PathBuf,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Treat private suffixes (e.g. `github.io`) as public suffixes when resolving
    pub allow_private_domains: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DB_PATH),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            allow_private_domains: true,
        }
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Replay navigations, one URL per line
/// domain_pages scan visits.txt
///
/// # Exclude a domain from scanning
/// domain_pages exclude add news.example.com
///
/// # Pick the notification channel
/// domain_pages channel page
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "domain_pages",
    about = "Matches visited sites against a curated pages database and notifies on hits."
)]
pub struct Opt {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    /// Database path (SQLite file holding the sync and local tiers)
    #[arg(long, value_parser, default_value = DB_PATH, global = true)]
    pub db_path: PathBuf,

    /// Resolve private suffixes such as github.io with ICANN rules only
    #[arg(long, global = true)]
    pub icann_only: bool,

    /// Action to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replay page loads from a file (one URL per line, `-` for stdin)
    Scan {
        /// File to read
        #[arg(value_parser)]
        file: PathBuf,
    },
    /// Manage the domain exclusion list
    Exclude(ExcludeArgs),
    /// Choose the notification channel
    Channel {
        /// log|notify|page
        channel: MessageKind,
    },
    /// Enable scanning
    Enable,
    /// Disable scanning
    Disable,
    /// Inspect or replace the pages database
    Pages(PagesArgs),
    /// Print current preferences
    Status,
}

/// Arguments for `exclude`.
#[derive(Debug, Args)]
pub struct ExcludeArgs {
    #[command(subcommand)]
    pub action: ExcludeAction,
}

/// Exclusion list edits.
#[derive(Debug, Subcommand)]
pub enum ExcludeAction {
    /// Add a domain (normalized to its registrable domain)
    Add { domain: String },
    /// Remove the entry at an index
    Remove { index: usize },
    /// Remove every entry
    Clear,
    /// Print entries with their indexes
    List,
}

/// Arguments for `pages`.
#[derive(Debug, Args)]
pub struct PagesArgs {
    #[command(subcommand)]
    pub action: PagesAction,
}

/// Pages database actions.
#[derive(Debug, Subcommand)]
pub enum PagesAction {
    /// Print records for one domain
    Find { domain: String },
    /// Print every record as JSON
    Export,
    /// Replace all records with the contents of a JSON file
    Import {
        #[arg(value_parser)]
        file: PathBuf,
    },
}

impl From<&Opt> for Config {
    fn from(opt: &Opt) -> Self {
        Self {
            db_path: opt.db_path.clone(),
            log_level: opt.log_level.clone(),
            log_format: opt.log_format.clone(),
            allow_private_domains: !opt.icann_only,
        }
    }
}
