// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare DNS provider for the DDNS system.
//
// - One HTTP request per call: a lookup is one GET, an update is one PUT
// - Errors are returned to the engine; no retry, no backoff, no caching
// - HTTP timeout configured (30 seconds)
// - Non-JSON error responses are classified by status (401/403, 404, 429, 5xx)
// - Dry-run mode for safe testing
//
// ## Security Requirements
//
// - API token NEVER appears in logs
// - Provider MUST fail fast if token is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

pub mod models;

use async_trait::async_trait;
use ddns_core::traits::{DnsProvider, DnsRecord};
use ddns_core::{DdnsConfig, Error, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub use models::{ApiError, ApiResponse, UpdateRecordRequest};

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER_NAME: &str = "cloudflare";

/// Longest slice of an error body quoted in error messages
const BODY_EXCERPT_CHARS: usize = 200;

/// Cloudflare DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform the record lookup
/// - Log the intended PUT payload
/// - **NOT** actually modify DNS records
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// Zone holding the record
    zone_id: String,

    /// API root, overridable for tests
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform the GET but skip the PUT
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permissions
    /// - `zone_id`: Zone holding the record
    /// - `dry_run`: If true, perform lookups but skip updates
    ///
    /// # Errors
    ///
    /// `Error::Config` if the token or zone ID is empty, or the HTTP client
    /// cannot be built.
    pub fn new(
        api_token: impl Into<String>,
        zone_id: impl Into<String>,
        dry_run: bool,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let zone_id = zone_id.into();
        if zone_id.is_empty() {
            return Err(Error::config("Cloudflare zone ID cannot be empty"));
        }

        // No idle connections are kept: every call opens a fresh one
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        if dry_run {
            tracing::warn!("Cloudflare provider running in DRY-RUN mode - no changes will be made");
        }

        Ok(Self {
            api_token,
            zone_id,
            base_url: CLOUDFLARE_API_BASE.to_string(),
            client,
            dry_run,
        })
    }

    /// Create a provider from the daemon configuration
    pub fn from_config(config: &DdnsConfig) -> Result<Self> {
        Self::new(config.api_token.clone(), config.zone_id.clone(), config.dry_run)
    }

    /// Point the provider at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Start a request carrying the bearer token and JSON content type
    fn authorized(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.api_token)
            .header(CONTENT_TYPE, "application/json")
    }

    /// Send a request and decode the response envelope
    ///
    /// The body is decoded whatever the status, since Cloudflare reports
    /// most failures as an envelope with `success: false`. Only when that
    /// fails is a non-2xx status turned into a status-specific error.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        action: &str,
    ) -> Result<ApiResponse<T>> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(format!("{}: {}", action, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response body: {}", e)))?;

        match serde_json::from_str::<ApiResponse<T>>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(status_error(status, &body)),
            Err(e) => {
                tracing::debug!("Undecodable response body: {}", excerpt(&body));
                Err(Error::Decode(e))
            }
        }
    }
}

/// Map a non-2xx status with an undecodable body to an error
fn status_error(status: StatusCode, body: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "Invalid API token or insufficient permissions. Status: {}",
            status
        )),
        404 => Error::not_found(format!("Zone or record not found. Status: {}", status)),
        429 => Error::rate_limited(format!(
            "Rate limit exceeded. Please retry later. Status: {}",
            status
        )),
        500..=599 => Error::http(format!(
            "Cloudflare server error (transient): {} - {}",
            status,
            excerpt(body)
        )),
        _ => Error::http(format!("{} - {}", status, excerpt(body))),
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// Fetch the record named `record_name`
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?name=home.example.com
    /// Authorization: Bearer <token>
    /// ```
    async fn get_record(&self, record_name: &str) -> Result<DnsRecord> {
        let url = format!("{}/zones/{}/dns_records", self.base_url, self.zone_id);
        tracing::debug!("Looking up DNS record: {}", record_name);

        let envelope: ApiResponse<Vec<DnsRecord>> = self
            .send(
                self.authorized(Method::GET, &url)
                    .query(&[("name", record_name)]),
                "Failed to get current DNS record",
            )
            .await?;

        if !envelope.success {
            return Err(Error::provider(
                PROVIDER_NAME,
                format!("Failed to get current DNS record: {}", envelope.first_error()),
            ));
        }

        let records = envelope.result.unwrap_or_default();
        if records.len() > 1 {
            tracing::debug!(
                "{} records named {}, using the first",
                records.len(),
                record_name
            );
        }

        records
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(format!("DNS record not found: {}", record_name)))
    }

    /// Point `record_id` at `new_ip`
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// Authorization: Bearer <token>
    ///
    /// {"type":"A","name":"home.example.com","content":"203.0.113.9","ttl":0,"proxied":false}
    /// ```
    async fn update_record(
        &self,
        record_id: &str,
        record_name: &str,
        new_ip: &str,
    ) -> Result<DnsRecord> {
        let url = format!(
            "{}/zones/{}/dns_records/{}",
            self.base_url, self.zone_id, record_id
        );
        let payload = UpdateRecordRequest::a_record(record_name, new_ip);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {} with payload: {}",
                url,
                serde_json::to_string(&payload)?
            );
            return Ok(payload.to_record(record_id));
        }

        let envelope: ApiResponse<DnsRecord> = self
            .send(
                self.authorized(Method::PUT, &url).json(&payload),
                "Failed to update DNS record",
            )
            .await?;

        if !envelope.success {
            return Err(Error::provider(
                PROVIDER_NAME,
                format!("Failed to update DNS record: {}", envelope.first_error()),
            ));
        }

        tracing::info!("DNS record updated successfully.");
        Ok(envelope
            .result
            .unwrap_or_else(|| payload.to_record(record_id)))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
