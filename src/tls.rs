//! TLS certificate probing.
//!
//! The primary fetch goes through `reqwest`, which does not expose the peer
//! certificate. For `https` targets we run one extra handshake against the
//! final host to learn whether the chain verifies and when the certificate
//! expires.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rustls::pki_types::ServerName;
use tokio::net::TcpStream;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use crate::config::{TCP_CONNECT_TIMEOUT_SECS, TLS_HANDSHAKE_TIMEOUT_SECS};
use crate::models::TlsInfo;

/// Probes the TLS certificate of `host:port`.
///
/// A completed handshake means the chain verified against the webpki roots;
/// `valid` additionally requires the certificate to be unexpired. Connection
/// or handshake failures are returned as errors so the caller can record an
/// invalid-TLS result without failing the fetch.
pub async fn probe_certificate(host: &str, port: u16) -> Result<TlsInfo> {
    log::debug!("Probing TLS certificate for {host}:{port}");

    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    let server_name = ServerName::try_from(host.to_string())
        .map_err(|e| anyhow::anyhow!("Invalid server name {host}: {e}"))?;

    let sock = match tokio::time::timeout(
        Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
        TcpStream::connect((host.to_string(), port)),
    )
    .await
    {
        Ok(Ok(sock)) => sock,
        Ok(Err(e)) => return Err(anyhow::anyhow!("Failed to connect to {host}:{port}: {e}")),
        Err(_) => {
            return Err(anyhow::anyhow!(
                "TCP connection timeout for {host}:{port} ({TCP_CONNECT_TIMEOUT_SECS}s)"
            ))
        }
    };

    let connector = TlsConnector::from(Arc::new(config));
    let tls_stream = match tokio::time::timeout(
        Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
        connector.connect(server_name, sock),
    )
    .await
    {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => return Err(anyhow::anyhow!("TLS handshake failed for {host}: {e}")),
        Err(_) => {
            return Err(anyhow::anyhow!(
                "TLS handshake timeout for {host} ({TLS_HANDSHAKE_TIMEOUT_SECS}s)"
            ))
        }
    };

    let expiry = tls_stream
        .get_ref()
        .1
        .peer_certificates()
        .and_then(|certs| certs.first())
        .and_then(|cert| x509_parser::parse_x509_certificate(cert.as_ref()).ok())
        .and_then(|(_, cert)| {
            DateTime::<Utc>::from_timestamp(cert.validity().not_after.timestamp(), 0)
        });

    // The handshake already enforced chain validity; expiry is re-checked so
    // a certificate that lapses between probe and report stamps as invalid.
    let valid = expiry.is_none_or(|e| e > Utc::now());

    log::debug!("TLS probe for {host}: valid={valid}, expiry={expiry:?}");

    Ok(TlsInfo { valid, expiry })
}
