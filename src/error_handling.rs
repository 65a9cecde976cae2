//! Audit error taxonomy.
//!
//! Only primary-fetch-class errors cross the engine boundary as a failed
//! audit. TLS invalidity, auxiliary-resource failures, and per-analyzer
//! failures are absorbed into the report as data.

use thiserror::Error;

/// Errors that fail a whole audit.
#[derive(Error, Debug)]
pub enum AuditError {
    /// Malformed input URL; no normalization possible. Surfaced immediately,
    /// no audit attempted.
    #[error("InvalidURL: {0}")]
    InvalidUrl(String),

    /// The primary fetch could not reach the host.
    #[error("UnreachableHost: {0}")]
    UnreachableHost(String),

    /// The primary fetch (or the whole audit) exceeded its deadline.
    #[error("Timeout")]
    Timeout,

    /// The redirect chain exceeded the hop cap. Same class as a timeout.
    #[error("RedirectLoop: exceeded {0} redirect hops")]
    RedirectLoop(usize),

    /// A shared resource (HTTP client, logger) could not be initialized.
    #[error("Initialization error: {0}")]
    Initialization(String),
}

impl AuditError {
    /// Categorizes a `reqwest::Error` from the primary fetch.
    ///
    /// Timeouts map to [`AuditError::Timeout`]; everything else (connect
    /// failures, protocol errors, body errors) is an unreachable host from
    /// the audit's point of view.
    pub fn from_fetch(error: &reqwest::Error) -> AuditError {
        if error.is_timeout() {
            AuditError::Timeout
        } else if error.is_connect() {
            AuditError::UnreachableHost(format!("connection failed: {error}"))
        } else {
            AuditError::UnreachableHost(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_displays_bare_name() {
        // The presentation layer surfaces this string verbatim in the
        // `{"error": ...}` body.
        assert_eq!(AuditError::Timeout.to_string(), "Timeout");
    }

    #[test]
    fn test_invalid_url_display() {
        let err = AuditError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().starts_with("InvalidURL"));
    }

    #[test]
    fn test_redirect_loop_names_the_cap() {
        let err = AuditError::RedirectLoop(5);
        assert!(err.to_string().contains('5'));
    }
}
