//! Core traits for the DNS records data source
//!
//! - [`DnsRecordsClient`]: the upstream "list DNS records" operation
//! - [`StateStore`]: host-managed state the read handler publishes into

pub mod dns_records_client;
pub mod state_store;

pub use dns_records_client::{DnsRecord, DnsRecordsClient, DnsRecordsClientFactory, RecordFilter};
pub use state_store::{StateSnapshot, StateStore};
