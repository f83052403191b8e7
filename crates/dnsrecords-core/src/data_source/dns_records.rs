// # DNS Records Data Source
//
// Lists the DNS records of one zone, optionally filtered by name, type and
// content, and publishes them as the computed `dns_records` list.
//
// ## Behavior
//
// - One upstream call per read; no pagination, retry or caching
// - Upstream order is preserved; nothing is filtered or deduplicated here
// - Timestamps are rendered RFC 1123 style: `Fri, 01 Jan 2021 00:00:00 UTC`
// - The instance id is the read time, so every read yields new state

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::DataSource;
use crate::error::{Error, Result};
use crate::schema::{Attribute, Schema, ValueType};
use crate::traits::{DnsRecord, DnsRecordsClient, RecordFilter, StateStore};

/// Type name of the data source
pub const DATA_SOURCE_NAME: &str = "cloudflare_dns_records";

/// Key the records are published under
const DNS_RECORDS_KEY: &str = "dns_records";

/// RFC 1123 layout with the zone abbreviation
const TIMESTAMP_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %Z";

/// Schema of the DNS records data source
pub fn dns_records_schema() -> Schema {
    let record = Schema::new()
        .with("id", Attribute::required(ValueType::String))
        .with("name", Attribute::required(ValueType::String))
        .with("type", Attribute::required(ValueType::String))
        .with("content", Attribute::optional(ValueType::String))
        .with("zone_id", Attribute::required(ValueType::String))
        .with("zone_name", Attribute::required(ValueType::String))
        .with("ttl", Attribute::optional(ValueType::Int))
        .with("created_on", Attribute::optional(ValueType::String))
        .with("modified_on", Attribute::optional(ValueType::String));

    Schema::new()
        .with("zone_id", Attribute::required(ValueType::String))
        .with("name", Attribute::optional(ValueType::String))
        .with("type", Attribute::optional(ValueType::String))
        .with("content", Attribute::optional(ValueType::String))
        .with(
            DNS_RECORDS_KEY,
            Attribute::computed(ValueType::List(Box::new(record))),
        )
}

/// Typed configuration of one data source instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecordsConfig {
    /// Zone to list records from
    pub zone_id: String,
    /// Only records with this name
    #[serde(default)]
    pub name: Option<String>,
    /// Only records of this type
    #[serde(default, rename = "type")]
    pub record_type: Option<String>,
    /// Only records with this content
    #[serde(default)]
    pub content: Option<String>,
}

impl DnsRecordsConfig {
    /// Create a configuration without filters
    pub fn new(zone_id: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            ..Self::default()
        }
    }

    /// Validate a raw host configuration and convert it
    ///
    /// This is the only place untyped configuration is inspected.
    pub fn from_raw(raw: &Value) -> Result<Self> {
        dns_records_schema().validate_config(raw)?;

        let config: Self = serde_json::from_value(raw.clone())?;
        if config.zone_id.trim().is_empty() {
            return Err(Error::config("zone_id: must not be empty"));
        }

        Ok(config)
    }

    /// Upstream filter; unset fields become the empty string
    pub fn filter(&self) -> RecordFilter {
        RecordFilter {
            zone_id: self.zone_id.clone(),
            record_type: self.record_type.clone().unwrap_or_default(),
            name: self.name.clone().unwrap_or_default(),
            content: self.content.clone().unwrap_or_default(),
        }
    }
}

/// One element of the published `dns_records` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecordDetails {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub content: String,
    pub zone_id: String,
    pub zone_name: String,
    pub ttl: i64,
    pub created_on: String,
    pub modified_on: String,
}

impl From<&DnsRecord> for DnsRecordDetails {
    fn from(record: &DnsRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            record_type: record.record_type.clone(),
            content: record.content.clone(),
            zone_id: record.zone_id.clone(),
            zone_name: record.zone_name.clone(),
            ttl: record.ttl,
            created_on: format_timestamp(&record.created_on),
            modified_on: format_timestamp(&record.modified_on),
        }
    }
}

/// Render a timestamp as `Mon, 02 Jan 2006 15:04:05 UTC`
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Read handler: list matching records and publish them into `state`
///
/// # Errors
///
/// - [`Error::ListRecords`] if the upstream call fails; `state` is untouched
/// - [`Error::SetState`] if `state` rejects the computed list; the id is not set
pub async fn read_dns_records(
    config: &DnsRecordsConfig,
    client: &dyn DnsRecordsClient,
    state: &dyn StateStore,
) -> Result<()> {
    tracing::debug!("Reading DnsRecords");

    let filter = config.filter();
    tracing::debug!(
        zone_id = %filter.zone_id,
        name = %filter.name,
        record_type = %filter.record_type,
        content = %filter.content,
        client = client.client_name(),
        "Listing DNS records"
    );

    let records = client
        .list_dns_records(&filter)
        .await
        .map_err(Error::list_records)?;

    let details: Vec<DnsRecordDetails> = records.iter().map(DnsRecordDetails::from).collect();
    let value = serde_json::to_value(&details).map_err(Error::set_state)?;

    state
        .set(DNS_RECORDS_KEY, value)
        .await
        .map_err(Error::set_state)?;

    let id = Utc::now().to_string();
    state.set_id(&id).await?;

    tracing::info!(
        "Read {} DNS record(s) for zone {}",
        details.len(),
        config.zone_id
    );
    Ok(())
}

/// The DNS records data source bound to a shared API client
pub struct DnsRecordsDataSource {
    client: Arc<dyn DnsRecordsClient>,
}

impl DnsRecordsDataSource {
    /// Create a data source using `client` for every read
    pub fn new(client: Arc<dyn DnsRecordsClient>) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for DnsRecordsDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsRecordsDataSource")
            .field("client", &self.client.client_name())
            .finish()
    }
}

#[async_trait]
impl DataSource for DnsRecordsDataSource {
    fn name(&self) -> &'static str {
        DATA_SOURCE_NAME
    }

    fn schema(&self) -> Schema {
        dns_records_schema()
    }

    async fn read(&self, raw_config: &Value, state: &dyn StateStore) -> Result<()> {
        let config = DnsRecordsConfig::from_raw(raw_config)?;
        read_dns_records(&config, self.client.as_ref(), state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStateStore;
    use chrono::TimeZone;
    use serde_json::json;
    use std::sync::Mutex;

    struct FixedClient {
        records: Vec<DnsRecord>,
        seen: Mutex<Vec<RecordFilter>>,
    }

    #[async_trait]
    impl DnsRecordsClient for FixedClient {
        async fn list_dns_records(&self, filter: &RecordFilter) -> Result<Vec<DnsRecord>> {
            self.seen.lock().unwrap().push(filter.clone());
            Ok(self.records.clone())
        }

        fn client_name(&self) -> &'static str {
            "fixed"
        }
    }

    fn record() -> DnsRecord {
        DnsRecord {
            id: "rec1".to_string(),
            name: "www.example.com".to_string(),
            record_type: "A".to_string(),
            content: "203.0.113.5".to_string(),
            zone_id: "abc123".to_string(),
            zone_name: "example.com".to_string(),
            ttl: 300,
            created_on: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
            modified_on: Utc.with_ymd_and_hms(2021, 1, 2, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn formats_rfc1123_timestamps() {
        let ts = Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap();
        assert_eq!(format_timestamp(&ts), "Mon, 02 Jan 2006 15:04:05 UTC");
    }

    #[test]
    fn schema_declares_inputs_and_output() {
        let schema = dns_records_schema();

        assert!(schema.attribute("zone_id").unwrap().required);
        for name in ["name", "type", "content"] {
            assert!(schema.attribute(name).unwrap().optional, "{} is optional", name);
        }

        let output = schema.attribute("dns_records").unwrap();
        assert!(output.computed);
        let ValueType::List(element) = &output.value_type else {
            panic!("dns_records must be a list");
        };
        for name in ["id", "name", "type", "zone_id", "zone_name"] {
            assert!(element.attribute(name).unwrap().required, "{} is required", name);
        }
        assert_eq!(element.attribute("ttl").unwrap().value_type, ValueType::Int);
    }

    #[test]
    fn from_raw_validates_and_converts() {
        let config = DnsRecordsConfig::from_raw(&json!({
            "zone_id": "abc123",
            "type": "MX",
        }))
        .unwrap();

        assert_eq!(config.zone_id, "abc123");
        assert_eq!(config.record_type.as_deref(), Some("MX"));
        assert_eq!(config.name, None);

        assert!(DnsRecordsConfig::from_raw(&json!({})).is_err());
        assert!(DnsRecordsConfig::from_raw(&json!({"zone_id": ""})).is_err());
        assert!(DnsRecordsConfig::from_raw(&json!({"zone_id": "z", "ttl": 1})).is_err());
        assert!(DnsRecordsConfig::from_raw(&json!({"zone_id": "z", "dns_records": []})).is_err());
    }

    #[test]
    fn filter_uses_empty_string_for_unset_fields() {
        let mut config = DnsRecordsConfig::new("abc123");
        config.content = Some("203.0.113.5".to_string());

        assert_eq!(
            config.filter(),
            RecordFilter::new("abc123").with_content("203.0.113.5")
        );
    }

    #[tokio::test]
    async fn read_publishes_mapped_records() {
        let client = FixedClient {
            records: vec![record()],
            seen: Mutex::new(Vec::new()),
        };
        let state = MemoryStateStore::new(dns_records_schema());

        read_dns_records(&DnsRecordsConfig::new("abc123"), &client, &state)
            .await
            .unwrap();

        assert_eq!(
            state.get("dns_records").await.unwrap(),
            Some(json!([{
                "id": "rec1",
                "name": "www.example.com",
                "type": "A",
                "content": "203.0.113.5",
                "zone_id": "abc123",
                "zone_name": "example.com",
                "ttl": 300,
                "created_on": "Fri, 01 Jan 2021 00:00:00 UTC",
                "modified_on": "Sat, 02 Jan 2021 00:00:00 UTC",
            }]))
        );
        assert!(state.id().await.unwrap().is_some());
        assert_eq!(
            client.seen.lock().unwrap().as_slice(),
            &[RecordFilter::new("abc123")]
        );
    }

    #[tokio::test]
    async fn data_source_rejects_invalid_config_before_calling_client() {
        let client = Arc::new(FixedClient {
            records: vec![record()],
            seen: Mutex::new(Vec::new()),
        });
        let source = DnsRecordsDataSource::new(client.clone());
        let state = MemoryStateStore::new(source.schema());

        let err = source.read(&json!({"name": "www"}), &state).await.unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert!(client.seen.lock().unwrap().is_empty());
        assert!(state.is_empty().await);
        assert_eq!(source.name(), "cloudflare_dns_records");
    }
}
