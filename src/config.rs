//! Configuration: tunable constants and command-line options.
//!
//! Scoring penalties, category weights, and performance-heuristic coefficients
//! live here as named constants so they can be rebalanced without touching
//! analyzer code.

use std::ops::RangeInclusive;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::models::Mode;

// Network operation timeouts
/// Default per-request timeout for the primary page fetch, in seconds.
pub const PRIMARY_TIMEOUT_SECS: u64 = 15;
/// Timeout for each auxiliary fetch (robots.txt, sitemap.xml).
pub const AUX_TIMEOUT: Duration = Duration::from_secs(5);
/// TCP connection timeout for the TLS certificate probe, in seconds.
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// TLS handshake timeout for the certificate probe, in seconds.
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 5;
/// Umbrella deadline for a whole audit. Once elapsed, the audit is abandoned
/// and surfaces as a timeout.
pub const AUDIT_DEADLINE: Duration = Duration::from_secs(45);

// Redirect handling
/// Maximum number of redirect hops to follow on the primary fetch.
/// Exceeding the cap fails the audit with a redirect-loop error.
pub const MAX_REDIRECT_HOPS: usize = 5;

// URL validation
/// Maximum accepted URL length. Matches common browser and server limits.
pub const MAX_URL_LENGTH: usize = 2048;

/// Default User-Agent string for HTTP requests.
///
/// Uses a generic Chrome-like string without a specific version number to avoid
/// becoming outdated. Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// Security header names
pub const HEADER_STRICT_TRANSPORT_SECURITY: &str = "Strict-Transport-Security";
pub const HEADER_X_FRAME_OPTIONS: &str = "X-Frame-Options";
pub const HEADER_CONTENT_SECURITY_POLICY: &str = "Content-Security-Policy";
pub const HEADER_X_CONTENT_TYPE_OPTIONS: &str = "X-Content-Type-Options";

/// Security headers every audited page is expected to send.
/// Each absent header emits one finding. To add/remove headers, modify this array.
pub const REQUIRED_SECURITY_HEADERS: &[&str] = &[
    HEADER_STRICT_TRANSPORT_SECURITY,
    HEADER_X_FRAME_OPTIONS,
    HEADER_CONTENT_SECURITY_POLICY,
    HEADER_X_CONTENT_TYPE_OPTIONS,
];

/// TLDs that show up disproportionately in phishing campaigns.
/// The heuristic built on this list is advisory, not authoritative.
pub const HIGH_RISK_TLDS: &[&str] = &["zip", "mov", "tk", "ml", "gq", "cf"];

// Performance heuristic coefficients.
// The fetched document stands in for the largest content element since
// sub-resource fetching is out of scope.
/// First-contentful-paint estimate: milliseconds added per KiB of payload (desktop).
pub const K1_FCP_DESKTOP: f64 = 2.0;
/// First-contentful-paint estimate: milliseconds added per KiB of payload (mobile).
pub const K1_FCP_MOBILE: f64 = 4.0;
/// Largest-contentful-paint estimate: additional milliseconds per KiB on top of FCP.
pub const K2_LCP: f64 = 1.5;
/// Layout-shift estimate contributed by each redirect hop.
pub const K_CLS: f64 = 0.05;

// Vitals thresholds, aligned with the Core Web Vitals "needs improvement" cutoffs.
pub const FCP_THRESHOLD_MS: f64 = 1800.0;
pub const LCP_THRESHOLD_MS: f64 = 2500.0;
pub const CLS_THRESHOLD: f64 = 0.1;

// SEO length bands (characters)
pub const TITLE_LENGTH_RANGE: RangeInclusive<usize> = 10..=60;
pub const META_DESCRIPTION_LENGTH_RANGE: RangeInclusive<usize> = 50..=160;

// Scoring
/// Keywords whose presence in a finding's text classifies it as critical.
/// Matching is case-sensitive; this classifier is the single source of truth
/// for severity everywhere in the report.
pub const CRITICAL_KEYWORDS: &[&str] = &["Missing", "Invalid", "High"];

/// Score deduction per critical finding.
pub const CRITICAL_PENALTY: u32 = 15;
/// Score deduction per minor finding.
pub const MINOR_PENALTY: u32 = 5;

/// Relative weight of each category in the overall score.
///
/// Defaults are equal; operators can rebalance emphasis here without touching
/// analyzer code. Weights should sum to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct CategoryWeights {
    pub security: f64,
    pub performance: f64,
    pub seo: f64,
    pub accessibility: f64,
}

/// Default category weighting (equal emphasis).
pub const DEFAULT_WEIGHTS: CategoryWeights = CategoryWeights {
    security: 0.25,
    performance: 0.25,
    seo: 0.25,
    accessibility: 0.25,
};

/// Network settings for the fetch phase.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Per-request timeout in seconds for the primary fetch.
    pub timeout_seconds: u64,
    /// HTTP User-Agent header value.
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        FetchSettings {
            timeout_seconds: PRIMARY_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
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
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Plain,
    Json,
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Basic usage
/// site_audit example.com
///
/// # Mobile-mode audit with pretty-printed output
/// site_audit example.com --mode mobile --pretty
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "site_audit",
    about = "Audits a website and prints a scored JSON report."
)]
pub struct Opt {
    /// URL to audit (scheme defaults to https)
    #[arg(value_parser)]
    pub url: String,

    /// Audit mode: desktop|mobile (affects performance coefficients only)
    #[arg(long, value_enum, default_value_t = Mode::Desktop)]
    pub mode: Mode,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Per-request timeout in seconds for the primary fetch
    #[arg(long, default_value_t = PRIMARY_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

impl Opt {
    /// Splits the CLI options into the library's request and fetch settings.
    pub fn to_request_and_settings(&self) -> (crate::models::AuditRequest, FetchSettings) {
        (
            crate::models::AuditRequest {
                url: self.url.clone(),
                mode: self.mode,
            },
            FetchSettings {
                timeout_seconds: self.timeout_seconds,
                user_agent: self.user_agent.clone(),
            },
        )
    }
}
