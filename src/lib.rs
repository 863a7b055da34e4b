//! domain_pages library: match visited sites against a curated pages database
//!
//! On each page load the background process resolves the visited host to its
//! registrable domain, looks the domain up through a read-through cache over
//! the pages database, and reports the result exactly once: a badge count plus
//! one of several notification channels. A user-managed exclusion list and an
//! on/off switch gate scanning.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use domain_pages::notify::LoggingHost;
//! use domain_pages::preferences::Preferences;
//! use domain_pages::{storage, Background, DomainResolver, MainMessage};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let background = Background::start(
//!     storage::memory_tiers(),
//!     Preferences::shared(),
//!     Arc::new(LoggingHost),
//!     DomainResolver::default(),
//! )
//! .await?;
//!
//! background
//!     .on_message(MainMessage::page_loaded("sub.example.com", "https://sub.example.com/"))
//!     .await;
//! println!("badge: {:?}", background.badge().text());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime; preference writes are spawned onto
//! the current runtime.

pub mod app;
pub mod background;
pub mod cache;
pub mod config;
pub mod database;
pub mod domain;
pub mod error_handling;
pub mod initialization;
pub mod models;
pub mod notify;
pub mod preferences;
pub mod scanner;
pub mod storage;

// Re-export public API
pub use background::{Background, MessageBranch};
pub use config::{Command, Config, LogFormat, LogLevel, Opt};
pub use domain::{DomainResolver, ResolveOptions, Resolution};
pub use models::{PageRecord, PageSearchResult};
pub use notify::{MainMessage, MessageKind};
pub use run::run_command;
pub use scanner::ScanOutcome;

// Command runner shared by the binary and the integration tests
mod run {
    use std::fmt::Write as _;
    use std::path::Path;
    use std::sync::Arc;

    use anyhow::{bail, Context, Result};
    use log::info;
    use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

    use crate::app::{print_replay_statistics, replay_navigations};
    use crate::background::Background;
    use crate::config::{Command, Config, ExcludeAction, PagesAction};
    use crate::initialization::{init_resolver, init_storage};
    use crate::models::PageRecord;
    use crate::notify::LoggingHost;
    use crate::preferences::Preferences;

    /// Runs one CLI command against the storage described by `config`.
    ///
    /// Returns the text to print on stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be opened, an input file cannot be
    /// read, or the command arguments are invalid (unknown domain, bad index).
    pub async fn run_command(
        config: &Config,
        command: Command,
        preferences: Arc<Preferences>,
    ) -> Result<String> {
        let tiers = init_storage(config)
            .await
            .context("Failed to open storage")?;
        let resolver = init_resolver(config);
        let background = Background::start(tiers, preferences, Arc::new(LoggingHost), resolver)
            .await
            .context("Failed to start background process")?;
        background.init_preferences().await;

        let output = match command {
            Command::Scan { file } => scan(&background, &file).await?,
            Command::Exclude(args) => exclude(&background, args.action)?,
            Command::Channel { channel } => {
                background.preferences().notification_preference.set(channel);
                format!("Notification channel: {channel}")
            }
            Command::Enable => set_enabled(&background, true),
            Command::Disable => set_enabled(&background, false),
            Command::Pages(args) => pages(&background, args.action).await?,
            Command::Status => status(&background).await?,
        };

        background
            .preferences()
            .save()
            .await
            .context("Failed to save preferences")?;
        Ok(output)
    }

    async fn scan(background: &Background, file: &Path) -> Result<String> {
        let read = if file == Path::new("-") {
            read_lines(tokio::io::stdin()).await
        } else {
            let f = tokio::fs::File::open(file)
                .await
                .with_context(|| format!("Failed to open {}", file.display()))?;
            read_lines(f).await
        };
        let lines = read.with_context(|| format!("Failed to read {}", file.display()))?;

        info!("Replaying {} lines from {}", lines.len(), file.display());
        let summary = replay_navigations(background, &lines).await;
        print_replay_statistics(&summary, &background.cache().stats());

        Ok(format!(
            "✅ Scanned {} page load{}: {} with pages ({} pages), {} excluded, {} failed. Badge: {}",
            summary.scanned,
            if summary.scanned == 1 { "" } else { "s" },
            summary.pages_hit,
            summary.pages_found,
            summary.excluded,
            summary.failed,
            background.badge().text().unwrap_or_default()
        ))
    }

    fn set_enabled(background: &Background, enabled: bool) -> String {
        background.preferences().is_enabled.set(enabled);
        background.indicate_status();
        format!("Scanning {}", if enabled { "enabled" } else { "disabled" })
    }

    async fn read_lines<R: AsyncRead + Unpin>(reader: R) -> std::io::Result<Vec<String>> {
        let mut lines = BufReader::new(reader).lines();
        let mut out = Vec::new();
        while let Some(line) = lines.next_line().await? {
            out.push(line);
        }
        Ok(out)
    }

    fn exclude(background: &Background, action: ExcludeAction) -> Result<String> {
        let exclusions = &background.preferences().domain_exclusions;
        let output = match action {
            ExcludeAction::Add { domain } => {
                let stored = exclusions.add_domain(&background.resolver(), &domain)?;
                format!("Excluded {stored}")
            }
            ExcludeAction::Remove { index } => match exclusions.delete_at(index) {
                Some(removed) => format!("Removed {removed}"),
                None => bail!("No exclusion at index {index}"),
            },
            ExcludeAction::Clear => {
                exclusions.clear();
                "Cleared exclusions".to_string()
            }
            ExcludeAction::List => list_exclusions(&exclusions.get()),
        };
        Ok(output)
    }

    fn list_exclusions(entries: &[String]) -> String {
        if entries.is_empty() {
            return "No excluded domains".to_string();
        }
        let mut out = String::new();
        for (index, domain) in entries.iter().enumerate() {
            let _ = writeln!(out, "{index}: {domain}");
        }
        out.trim_end().to_string()
    }

    async fn pages(background: &Background, action: PagesAction) -> Result<String> {
        let db = background.pages();
        match action {
            PagesAction::Find { domain } => {
                let resolved = background.resolver().require(&domain)?;
                let domain = resolved.registrable_domain.unwrap_or_default();
                let records = db.find_by_domain(&domain).await?;
                if records.is_empty() {
                    return Ok(format!("No pages for {domain}"));
                }
                let mut out = String::new();
                for record in &records {
                    let _ = writeln!(out, "{} <{}>", record.title, record.url);
                }
                Ok(out.trim_end().to_string())
            }
            PagesAction::Export => Ok(db.export_json().await?),
            PagesAction::Import { file } => {
                let raw = tokio::fs::read_to_string(&file)
                    .await
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                let records: Vec<PageRecord> = serde_json::from_str(&raw)
                    .with_context(|| format!("Invalid page records in {}", file.display()))?;
                let stored = db.import(records).await?;
                Ok(format!("Imported {stored} page records"))
            }
        }
    }

    async fn status(background: &Background) -> Result<String> {
        let prefs = background.preferences();
        prefs.dump();
        let pages = background.pages().all().await?;
        Ok(format!(
            "enabled: {}\nchannel: {}\nexclusions: {}\npages: {}",
            prefs.is_enabled.get(),
            prefs.notification_preference.get(),
            prefs.domain_exclusions.get().len(),
            pages.len()
        ))
    }
}
