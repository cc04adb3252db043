// # HTTP IP Source
//
// This crate provides an HTTP-based IP source for the DDNS system.
//
// ## Architecture
//
// Fetches the current public IP from an external echo service
// (`https://ipv4.icanhazip.com` by default) that answers with the caller's
// address as plain text. One GET per call, no caching, no retry: the engine
// decides when to ask again.
//
// ## Failures
//
// Transport and body-read failures are errors. So is a non-2xx status: the
// body of an error page is never handed on as an address. Any 2xx body is
// returned trimmed, even when it is not an IPv4 literal (logged once here
// as a warning), so a bad answer reaches the engine as an apparent change.

use ddns_core::traits::IpSource;
use ddns_core::{DdnsConfig, Error, Result};

use std::net::Ipv4Addr;
use std::time::Duration;

pub use ddns_core::config::DEFAULT_IP_SOURCE_URL;

/// Default HTTP timeout for IP lookups
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP-based public IP source
#[derive(Debug)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch IP from (e.g., "https://ipv4.icanhazip.com")
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create a source for the configured echo service
    pub fn from_config(config: &DdnsConfig) -> Result<Self> {
        Self::new(config.ip_source_url.clone())
    }

    /// The URL this source queries
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch current IP from HTTP service
    async fn fetch_ip(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("Failed to get public IP: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read public IP response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::http(format!(
                "Public IP service returned {}: {}",
                status,
                body.trim()
            )));
        }

        let ip = body.trim().to_string();

        if ip.parse::<Ipv4Addr>().is_err() {
            tracing::warn!("Public IP service returned a non-IPv4 body: {:?}", ip);
        }

        Ok(ip)
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<String> {
        let ip = self.fetch_ip().await?;
        tracing::debug!("Public IP from {}: {}", self.url, ip);
        Ok(ip)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
