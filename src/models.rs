//! Core data types shared across the audit pipeline.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One audit request, immutable once submitted.
///
/// Consumed as JSON from the presentation layer:
/// `{ "url": "example.com", "mode": "desktop" }`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditRequest {
    /// Target URL; a missing scheme defaults to `https`.
    pub url: String,
    /// Audit mode. Affects only the performance-heuristic coefficients.
    #[serde(default)]
    pub mode: Mode,
}

/// Audit mode, threaded explicitly through the call rather than read from
/// ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Desktop,
    Mobile,
}

/// TLS handshake result for the primary fetch.
#[derive(Debug, Clone)]
pub struct TlsInfo {
    /// Whether the certificate chain verified and the certificate is unexpired.
    pub valid: bool,
    /// Certificate expiry, when the probe could read it.
    pub expiry: Option<DateTime<Utc>>,
}

/// The fetched target page.
///
/// Produced once by the fetcher and treated as immutable by every analyzer,
/// so it can be shared without locking.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects.
    pub final_url: url::Url,
    /// HTTP status of the final response.
    pub status_code: u16,
    /// Response headers, keyed by lowercased name.
    pub headers: HashMap<String, String>,
    /// Every `Set-Cookie` header value. Kept apart from the header map because
    /// the header may repeat and a map cannot hold duplicates.
    pub set_cookie: Vec<String>,
    /// Raw response body.
    pub body: Vec<u8>,
    /// TLS probe result; `None` when no certificate information is available
    /// (plain-HTTP target or failed probe).
    pub tls_info: Option<TlsInfo>,
    /// Wall-clock latency of the primary fetch, redirects included.
    pub latency_ms: u64,
    /// Body size in bytes.
    pub size_bytes: u64,
    /// Number of redirect hops followed.
    pub redirect_count: usize,
}

impl FetchedPage {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Case-insensitive header presence check.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(&name.to_ascii_lowercase())
    }
}

/// Result of probing a well-known auxiliary path (`robots.txt`, `sitemap.xml`).
///
/// Auxiliary failures never abort the audit; they only feed SEO findings.
#[derive(Debug, Clone)]
pub struct AuxiliaryResource {
    /// Whether the resource answered with a success status.
    pub present: bool,
    /// Status code of the probe response, if one arrived.
    pub status_code: Option<u16>,
    /// Transport-level error, if the probe failed outright.
    pub error: Option<String>,
}

impl AuxiliaryResource {
    /// An auxiliary resource that answered with the given status.
    pub fn answered(status_code: u16) -> Self {
        AuxiliaryResource {
            present: (200..300).contains(&status_code),
            status_code: Some(status_code),
            error: None,
        }
    }

    /// An auxiliary resource whose probe failed at the transport level.
    pub fn unreachable(error: impl Into<String>) -> Self {
        AuxiliaryResource {
            present: false,
            status_code: None,
            error: Some(error.into()),
        }
    }
}

/// Heuristic Core Web Vitals estimates, derived from transport-level signals
/// rather than a render timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerfMetrics {
    /// Estimated First Contentful Paint, in milliseconds.
    pub fcp: f64,
    /// Estimated Largest Contentful Paint, in milliseconds.
    pub lcp: f64,
    /// Estimated Cumulative Layout Shift, unitless in [0, 1].
    pub cls: f64,
}
