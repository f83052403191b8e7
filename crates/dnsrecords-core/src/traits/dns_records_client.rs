// # DNS Records Client Trait
//
// Defines the upstream "list DNS records for a zone" operation.
//
// ## Implementations
//
// - Cloudflare: `dnsrecords-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use dnsrecords_core::traits::{DnsRecordsClient, RecordFilter};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let client = /* DnsRecordsClient implementation */;
//
//     let filter = RecordFilter::new("023e105f4ecef8ad9ca31a8372d0c353").with_type("A");
//     for record in client.list_dns_records(&filter).await? {
//         println!("{} {} {}", record.name, record.record_type, record.content);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Query for the upstream list operation
///
/// An empty `record_type`, `name` or `content` means "no filter on this
/// field"; the upstream API treats it as match-any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Zone to list records from
    pub zone_id: String,
    /// DNS record type (A, AAAA, CNAME, ...)
    pub record_type: String,
    /// Fully qualified record name
    pub name: String,
    /// Record content
    pub content: String,
}

impl RecordFilter {
    /// Create a filter matching every record in `zone_id`
    pub fn new(zone_id: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            ..Self::default()
        }
    }

    /// Restrict to a record type
    pub fn with_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = record_type.into();
        self
    }

    /// Restrict to a record name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Restrict to a record content
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Non-empty filter fields as `(parameter, value)` pairs
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("type", self.record_type.as_str()),
            ("name", self.name.as_str()),
            ("content", self.content.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }
}

/// A DNS record as returned by the upstream API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Record identifier
    pub id: String,
    /// Fully qualified record name
    pub name: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: String,
    /// Record content
    #[serde(default)]
    pub content: String,
    /// Zone the record belongs to
    #[serde(default)]
    pub zone_id: String,
    /// Name of the zone
    #[serde(default)]
    pub zone_name: String,
    /// Time-to-live (1 = automatic)
    #[serde(default)]
    pub ttl: i64,
    /// Creation time
    pub created_on: DateTime<Utc>,
    /// Last modification time
    pub modified_on: DateTime<Utc>,
}

/// Trait for upstream DNS API clients
///
/// # Thread Safety
///
/// Clients are shared by the host across data source instances and must be
/// usable from concurrent tasks.
///
/// # Contract
///
/// - One call, one result set: no pagination loop, no retry, no caching
/// - Order of the returned records is the upstream order
/// - Errors carry the upstream message; the caller wraps them
#[async_trait]
pub trait DnsRecordsClient: Send + Sync {
    /// List the DNS records of `filter.zone_id` matching the filter
    async fn list_dns_records(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Get the client name (for logging/debugging)
    fn client_name(&self) -> &'static str;
}

/// Helper trait for constructing clients from configuration
pub trait DnsRecordsClientFactory: Send + Sync {
    /// Create a DnsRecordsClient instance from configuration
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn DnsRecordsClient>, crate::Error>;
}
