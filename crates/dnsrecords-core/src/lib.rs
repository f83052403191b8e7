// # dnsrecords-core
//
// Core library for the DNS records data source.
//
// ## Architecture Overview
//
// - **Schema**: declarative description of accepted inputs and computed outputs
// - **DataSource**: host-facing read interface; `DnsRecordsDataSource` is the
//   one implementation
// - **DnsRecordsClient**: trait for the upstream "list DNS records" operation
// - **StateStore**: trait for host-managed state (memory and file backed)
// - **ClientRegistry**: plugin-based registry building the shared API client
//
// ## Design Principles
//
// 1. **Typed boundary**: raw configuration is validated and converted once
// 2. **Single pass**: one upstream call per read, no retry, no cache
// 3. **All or nothing**: failed reads publish no output
// 4. **Library-First**: the host binary is a thin integration layer

pub mod config;
pub mod data_source;
pub mod error;
pub mod registry;
pub mod schema;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use config::ProviderConfig;
pub use data_source::{DataSource, DnsRecordsConfig, DnsRecordsDataSource, dns_records_schema};
pub use error::{Error, Result};
pub use registry::ClientRegistry;
pub use schema::Schema;
pub use state::{FileStateStore, MemoryStateStore};
pub use traits::{DnsRecord, DnsRecordsClient, RecordFilter, StateStore};
