//! Page and auxiliary-resource retrieval.
//!
//! The primary fetch walks redirects manually with a no-redirect client so
//! the hop count is captured and the cap is enforced; the auxiliary probes
//! (`robots.txt`, `sitemap.xml`) run on their own short timeouts and never
//! fail the audit.

use std::collections::HashMap;
use std::time::Instant;

use log::{debug, warn};
use reqwest::header::{ACCEPT, LOCATION, SET_COOKIE};
use url::Url;

use crate::config::{AUX_TIMEOUT, MAX_REDIRECT_HOPS, MAX_URL_LENGTH};
use crate::error_handling::AuditError;
use crate::models::{AuxiliaryResource, FetchedPage, TlsInfo};
use crate::tls::probe_certificate;

/// Validates and normalizes the input URL.
///
/// Trims surrounding whitespace, defaults a missing scheme to `https`, and
/// rejects empty input, oversized input, unparseable URLs, and non-http(s)
/// schemes.
pub fn normalize_url(raw: &str) -> Result<Url, AuditError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AuditError::InvalidUrl("empty URL".to_string()));
    }
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(AuditError::InvalidUrl(format!(
            "URL exceeds maximum length ({} > {MAX_URL_LENGTH})",
            trimmed.len()
        )));
    }

    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&candidate)
        .map_err(|e| AuditError::InvalidUrl(format!("{trimmed}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AuditError::InvalidUrl(format!(
                "unsupported scheme: {other}"
            )))
        }
    }
    if parsed.host_str().is_none() {
        return Err(AuditError::InvalidUrl(format!("{trimmed}: missing host")));
    }
    Ok(parsed)
}

/// Origin of a normalized URL, used to resolve the auxiliary paths.
pub fn origin_of(url: &Url) -> Url {
    let mut origin = url.clone();
    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    origin
}

/// Performs the primary retrieval.
///
/// A single GET per hop, following redirects up to [`MAX_REDIRECT_HOPS`].
/// Records wall-clock latency, payload size, the response headers (lowercased
/// keys), every `Set-Cookie` value, and the TLS probe result. No retries: a
/// network failure here is fatal to the whole audit.
pub async fn fetch_page(
    client: &reqwest::Client,
    url: &Url,
) -> Result<FetchedPage, AuditError> {
    let start = Instant::now();

    let mut current = url.clone();
    let mut redirect_count = 0usize;
    let response = loop {
        let resp = client
            .get(current.clone())
            .header(ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(|e| AuditError::from_fetch(&e))?;

        if resp.status().is_redirection() {
            if redirect_count >= MAX_REDIRECT_HOPS {
                return Err(AuditError::RedirectLoop(MAX_REDIRECT_HOPS));
            }
            let location = resp
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .ok_or_else(|| {
                    AuditError::UnreachableHost(format!(
                        "{current}: redirect without a Location header"
                    ))
                })?;
            // Location may be absolute or relative to the current URL
            current = Url::parse(&location)
                .or_else(|_| current.join(&location))
                .map_err(|e| AuditError::InvalidUrl(format!("{location}: {e}")))?;
            redirect_count += 1;
            debug!("Redirect hop {redirect_count} -> {current}");
            continue;
        }
        break resp;
    };

    let final_url = response.url().clone();
    let status_code = response.status().as_u16();

    let mut headers: HashMap<String, String> = HashMap::new();
    for (name, value) in response.headers() {
        headers.insert(
            name.as_str().to_ascii_lowercase(),
            value.to_str().unwrap_or_default().to_string(),
        );
    }
    let set_cookie: Vec<String> = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect();

    let body = response
        .bytes()
        .await
        .map_err(|e| AuditError::from_fetch(&e))?
        .to_vec();
    let latency_ms = start.elapsed().as_millis() as u64;
    let size_bytes = body.len() as u64;

    let tls_info = capture_tls_info(&final_url).await;

    debug!(
        "Fetched {final_url}: status {status_code}, {size_bytes} bytes, {latency_ms} ms, {redirect_count} redirects"
    );

    Ok(FetchedPage {
        final_url,
        status_code,
        headers,
        set_cookie,
        body,
        tls_info,
        latency_ms,
        size_bytes,
        redirect_count,
    })
}

/// TLS capture for the final URL.
///
/// Plain-HTTP targets get `valid = false` without a probe; a failed probe is
/// recorded the same way rather than failing the fetch.
async fn capture_tls_info(final_url: &Url) -> Option<TlsInfo> {
    if final_url.scheme() != "https" {
        return Some(TlsInfo {
            valid: false,
            expiry: None,
        });
    }
    let host = final_url.host_str()?;
    let port = final_url.port_or_known_default().unwrap_or(443);
    match probe_certificate(host, port).await {
        Ok(info) => Some(info),
        Err(e) => {
            warn!("TLS probe failed for {host}: {e}");
            Some(TlsInfo {
                valid: false,
                expiry: None,
            })
        }
    }
}

/// Probes one auxiliary path at the target's origin.
///
/// Runs a HEAD request on an independent short timeout. Failures are recorded
/// in the result, never propagated.
pub async fn fetch_auxiliary(
    client: &reqwest::Client,
    origin: &Url,
    path: &str,
) -> AuxiliaryResource {
    let target = match origin.join(path) {
        Ok(url) => url,
        Err(e) => return AuxiliaryResource::unreachable(e.to_string()),
    };
    match client.head(target.clone()).timeout(AUX_TIMEOUT).send().await {
        Ok(resp) => {
            debug!("Auxiliary {path}: status {}", resp.status());
            AuxiliaryResource::answered(resp.status().as_u16())
        }
        Err(e) => {
            warn!("Auxiliary {path} probe failed: {e}");
            AuxiliaryResource::unreachable(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url_adds_https() {
        let url = normalize_url("example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_normalize_url_preserves_scheme() {
        let url = normalize_url("http://example.com/path").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.path(), "/path");
    }

    #[test]
    fn test_normalize_url_trims_whitespace() {
        let url = normalize_url("  example.com \n").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_normalize_url_rejects_empty() {
        assert!(matches!(
            normalize_url("   "),
            Err(AuditError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_normalize_url_rejects_garbage() {
        assert!(matches!(
            normalize_url("not a valid url!!!"),
            Err(AuditError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_normalize_url_rejects_unsupported_scheme() {
        assert!(matches!(
            normalize_url("ftp://example.com"),
            Err(AuditError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_normalize_url_rejects_overlong() {
        let long = format!("example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(matches!(
            normalize_url(&long),
            Err(AuditError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_origin_of_strips_path_query_fragment() {
        let url = normalize_url("https://example.com/deep/page?q=1#top").unwrap();
        let origin = origin_of(&url);
        assert_eq!(origin.as_str(), "https://example.com/");
        assert_eq!(
            origin.join("robots.txt").unwrap().as_str(),
            "https://example.com/robots.txt"
        );
    }
}
