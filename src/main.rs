//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `site_audit` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Printing the JSON report (or the JSON error document) to stdout
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use site_audit::initialization::{init_crypto_provider, init_logger_with};
use site_audit::{run_audit, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    let log_level = opt.log_level.clone();
    let log_format = opt.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    init_crypto_provider();

    let (request, settings) = opt.to_request_and_settings();

    match run_audit(&request, &settings).await {
        Ok(report) => {
            let json = if opt.pretty {
                serde_json::to_string_pretty(&report)
            } else {
                serde_json::to_string(&report)
            }
            .context("Failed to serialize report")?;
            println!("{json}");
            Ok(())
        }
        Err(e) => {
            // Mirror the HTTP contract: an error document, non-success exit
            println!("{}", serde_json::json!({ "error": e.to_string() }));
            process::exit(1);
        }
    }
}
