//! Declarative data sources
//!
//! A data source is a read-only construct: the host validates the user's
//! configuration against [`DataSource::schema`], then calls
//! [`DataSource::read`], which fetches external state and publishes it into
//! the host's [`StateStore`].
//!
//! ## Read Flow
//!
//! ```text
//! host ──raw config──▶ DataSource::read ──filter──▶ DnsRecordsClient
//!                            │                          │
//!                            ◀───────── records ────────┘
//!                            │
//!                            ▼
//!                       StateStore (dns_records, id)
//! ```

mod dns_records;

pub use dns_records::{
    DATA_SOURCE_NAME, DnsRecordDetails, DnsRecordsConfig, DnsRecordsDataSource,
    dns_records_schema, format_timestamp, read_dns_records,
};

use crate::error::Result;
use crate::schema::Schema;
use crate::traits::StateStore;
use async_trait::async_trait;

/// Host-facing interface of a declarative data source
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Type name the host registers the data source under
    fn name(&self) -> &'static str;

    /// Accepted configuration and computed output
    fn schema(&self) -> Schema;

    /// Validate `raw_config`, read external state and publish it into `state`
    ///
    /// On error nothing has been published.
    async fn read(&self, raw_config: &serde_json::Value, state: &dyn StateStore) -> Result<()>;
}
