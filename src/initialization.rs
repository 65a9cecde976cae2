//! Shared-resource initialization: HTTP client, logger, crypto provider.

use std::io::Write;
use std::time::Duration;

use colored::Colorize;
use log::{LevelFilter, SetLoggerError};
use reqwest::ClientBuilder;
use rustls::crypto::{ring::default_provider, CryptoProvider};
use thiserror::Error;

use crate::config::{FetchSettings, LogFormat};

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

/// Initializes the HTTP client used for the primary and auxiliary fetches.
///
/// Redirects are disabled so the fetcher can walk the chain manually and
/// enforce the hop cap; the timeout and User-Agent come from the settings.
pub fn init_client(settings: &FetchSettings) -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(settings.timeout_seconds))
        .user_agent(settings.user_agent.clone())
        .build()?;
    Ok(client)
}

/// Initializes the crypto provider for TLS operations.
///
/// Must be called before any TLS connections are established. Safe to call
/// more than once; later calls are no-ops.
pub fn init_crypto_provider() {
    let _ = CryptoProvider::install_default(default_provider());
}

/// Initializes the logger with the specified level and format.
///
/// Reads `RUST_LOG` first, then overrides with the provided level, so
/// `RUST_LOG=debug` works for quick debugging while `--log-level` keeps
/// explicit control.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    builder.filter_module("html5ever", LevelFilter::Error);
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.filter_module("selectors", LevelFilter::Warn);
    builder.filter_module("site_audit", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
                    chrono::Utc::now().timestamp_millis(),
                    record.level(),
                    record.target(),
                    serde_json::to_string(&record.args().to_string())
                        .unwrap_or_else(|_| "\"\"".into())
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let level = record.level();
                let colored_level = match level {
                    log::Level::Error => level.to_string().red(),
                    log::Level::Warn => level.to_string().yellow(),
                    log::Level::Info => level.to_string().green(),
                    log::Level::Debug => level.to_string().blue(),
                    log::Level::Trace => level.to_string().purple(),
                };
                writeln!(
                    buf,
                    "{} [{}] {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    colored_level,
                    record.args()
                )
            });
        }
    }

    // try_init so tests that initialize twice don't panic
    let _ = builder.try_init();
    Ok(())
}
