//! Security analysis over the fetched page.
//!
//! Read-only checks against the response headers and TLS probe result:
//! - Invalid or missing TLS certificate
//! - Missing security headers (HSTS, X-Frame-Options, CSP, X-Content-Type-Options)
//! - Cookies set without Secure / HttpOnly / SameSite attributes
//! - Advisory phishing indicators on the host name

use url::{Host, Url};

use crate::config::{HIGH_RISK_TLDS, REQUIRED_SECURITY_HEADERS};
use crate::models::FetchedPage;
use crate::scoring::{CategoryResult, Finding};

/// Security category outcome plus the TLS verdict the report surfaces
/// separately as `ssl_valid`.
#[derive(Debug, Clone)]
pub struct SecurityAnalysis {
    pub ssl_valid: bool,
    pub result: CategoryResult,
}

/// Runs the security checklist.
pub fn analyze_security(page: &FetchedPage) -> SecurityAnalysis {
    let mut findings = Vec::new();

    let ssl_valid = page.tls_info.as_ref().is_some_and(|tls| tls.valid);
    if !ssl_valid {
        findings.push(Finding::new("Invalid or missing SSL certificate"));
    }

    for header in REQUIRED_SECURITY_HEADERS {
        if !page.has_header(header) {
            findings.push(Finding::new(format!("Missing {header} header")));
        }
    }

    for cookie in &page.set_cookie {
        let lower = cookie.to_ascii_lowercase();
        let name = cookie_name(cookie);
        if !lower.contains("secure") {
            findings.push(Finding::new(format!(
                "Cookie {name} set without the Secure attribute"
            )));
        }
        if !lower.contains("httponly") {
            findings.push(Finding::new(format!(
                "Cookie {name} set without the HttpOnly attribute"
            )));
        }
        if !lower.contains("samesite") {
            findings.push(Finding::new(format!(
                "Cookie {name} set without a SameSite attribute"
            )));
        }
    }

    if let Some(indicator) = phishing_indicator(&page.final_url) {
        findings.push(Finding::new(format!(
            "Host shows a phishing indicator: {indicator}"
        )));
    }

    SecurityAnalysis {
        ssl_valid,
        result: CategoryResult::from_findings(findings),
    }
}

fn cookie_name(set_cookie: &str) -> &str {
    set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split('=').next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("(unnamed)")
}

/// Advisory phishing heuristic over the host.
///
/// Flags IP-literal hosts, punycode (`xn--`) labels, and a small denylist of
/// high-risk TLDs. Returns the matched indicator, or `None`.
fn phishing_indicator(url: &Url) -> Option<&'static str> {
    match url.host() {
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => Some("IP-literal host"),
        Some(Host::Domain(domain)) => {
            if domain.split('.').any(|label| label.starts_with("xn--")) {
                return Some("punycode label in host name");
            }
            let tld = domain.rsplit('.').next().unwrap_or_default();
            if HIGH_RISK_TLDS.contains(&tld) {
                return Some("high-risk top-level domain");
            }
            None
        }
        None => None,
    }
}
