//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `domain_pages` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output
//!
//! All core functionality is implemented in the library crate.

use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use domain_pages::initialization::init_logger_with;
use domain_pages::preferences::Preferences;
use domain_pages::{run_command, Config, Opt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // RUST_LOG and friends may come from a .env file in the working directory
    let _ = dotenvy::dotenv();

    let opt = Opt::parse();
    let config = Config::from(&opt);

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    match run_command(&config, opt.command, Preferences::shared()).await {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            eprintln!("domain_pages error: {e:#}");
            process::exit(1);
        }
    }
}
