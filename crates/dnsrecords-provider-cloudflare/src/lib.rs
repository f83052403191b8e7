// # Cloudflare DNS Records Client
//
// This crate provides the Cloudflare API v4 implementation of
// `DnsRecordsClient` for the DNS records data source.
//
// ## Behavior
//
// - Makes exactly one HTTP request per `list_dns_records` call
// - Sends `type`, `name` and `content` query parameters only when non-empty
// - Maps HTTP status codes to specific errors (401/403, 404, 429, 5xx)
// - Treats a 2xx envelope with `success: false` as an error
// - HTTP timeout configured (30 seconds)
// - NO pagination: the first result page is the result set; a warning is
//   logged when the API reports more pages
// - NO retry, backoff or caching
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - Construction fails fast if the token is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records?type=...&name=...&content=...`

use async_trait::async_trait;
use dnsrecords_core::config::ProviderConfig;
use dnsrecords_core::traits::{DnsRecord, DnsRecordsClient, DnsRecordsClientFactory, RecordFilter};
use dnsrecords_core::{ClientRegistry, Error, Result};
use serde::Deserialize;
use std::time::Duration;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Response envelope shared by all Cloudflare API v4 endpoints
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
    #[serde(default)]
    result_info: Option<ResultInfo>,
}

/// Paging metadata of list endpoints
#[derive(Debug, Deserialize)]
struct ResultInfo {
    #[serde(default)]
    page: u64,
    #[serde(default)]
    total_pages: u64,
    #[serde(default)]
    total_count: u64,
}

impl ResultInfo {
    /// More records exist than the page that was returned
    fn is_truncated(&self) -> bool {
        self.total_pages > 1
    }
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    code: i64,
    message: String,
}

/// Render API errors as `message (code), message (code)`
fn describe_errors(errors: &[ApiMessage]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({})", e.message, e.code))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Cloudflare DNS records client
///
/// Stateless and single-shot; one instance is shared by every data source
/// read the host performs.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudflareClient {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

impl std::fmt::Debug for CloudflareClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareClient")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareClient {
    /// Create a client for the public Cloudflare API
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Read permission
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_token, CLOUDFLARE_API_BASE)
    }

    /// Create a client for a specific API base URL
    pub fn with_base_url(api_token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// API base URL in use
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Map a non-success HTTP status to an error
    fn status_error(status: reqwest::StatusCode, zone_id: &str, body: &str) -> Error {
        let detail = serde_json::from_str::<ApiResponse<serde_json::Value>>(body)
            .ok()
            .map(|envelope| describe_errors(&envelope.errors))
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| body.to_string());

        match status.as_u16() {
            401 | 403 => Error::auth(format!(
                "Invalid API token or insufficient permissions. Status: {} - {}",
                status, detail
            )),
            404 => Error::not_found(format!("Zone not found: {}", zone_id)),
            429 => Error::rate_limited(format!(
                "Rate limit exceeded. Please retry later. Status: {}",
                status
            )),
            500..=599 => Error::provider(
                "cloudflare",
                format!("Cloudflare server error (transient): {} - {}", status, detail),
            ),
            _ => Error::provider(
                "cloudflare",
                format!("DNS record listing failed: {} - {}", status, detail),
            ),
        }
    }
}

#[async_trait]
impl DnsRecordsClient for CloudflareClient {
    /// List DNS records of a zone
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?type=A&name=www.example.com
    /// Authorization: Bearer <token>
    /// ```
    async fn list_dns_records(&self, filter: &RecordFilter) -> Result<Vec<DnsRecord>> {
        let url = format!("{}/zones/{}/dns_records", self.base_url, filter.zone_id);
        let query = filter.query_pairs();

        tracing::debug!("Listing DNS records: zone {} filter {:?}", filter.zone_id, query);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(Self::status_error(status, &filter.zone_id, &error_text));
        }

        let envelope: ApiResponse<Vec<DnsRecord>> = response
            .json()
            .await
            .map_err(|e| Error::provider("cloudflare", format!("Failed to parse response: {}", e)))?;

        if !envelope.success {
            return Err(Error::provider(
                "cloudflare",
                format!("API request unsuccessful: {}", describe_errors(&envelope.errors)),
            ));
        }

        let records = envelope.result.ok_or_else(|| {
            Error::provider("cloudflare", "Invalid response format: result is missing")
        })?;

        if let Some(info) = envelope.result_info.as_ref().filter(|i| i.is_truncated()) {
            tracing::warn!(
                "Zone {} has {} matching DNS record(s) over {} pages; only page {} ({} record(s)) was read",
                filter.zone_id,
                info.total_count,
                info.total_pages,
                info.page,
                records.len()
            );
        }

        tracing::debug!("Found {} DNS record(s) in zone {}", records.len(), filter.zone_id);
        Ok(records)
    }

    fn client_name(&self) -> &'static str {
        "cloudflare"
    }
}

/// Factory for creating Cloudflare clients
pub struct CloudflareFactory;

impl DnsRecordsClientFactory for CloudflareFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsRecordsClient>> {
        match config {
            ProviderConfig::Cloudflare { api_token, base_url } => {
                let base_url = base_url.as_deref().unwrap_or(CLOUDFLARE_API_BASE);
                if base_url != CLOUDFLARE_API_BASE {
                    tracing::warn!("Cloudflare client using non-default API base URL: {}", base_url);
                }

                Ok(Box::new(CloudflareClient::with_base_url(
                    api_token.clone(),
                    base_url,
                )?))
            }
            _ => Err(Error::config("Invalid config for Cloudflare client")),
        }
    }
}

/// Register the Cloudflare client with a registry
///
/// # Example
///
/// ```rust
/// use dnsrecords_core::ClientRegistry;
///
/// let registry = ClientRegistry::new();
/// dnsrecords_provider_cloudflare::register(&registry);
/// assert!(registry.has_client("cloudflare"));
/// ```
pub fn register(registry: &ClientRegistry) {
    registry.register_client("cloudflare", Box::new(CloudflareFactory));
}
