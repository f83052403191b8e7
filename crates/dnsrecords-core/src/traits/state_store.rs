// # State Store Trait
//
// Host-managed state for one data source instance.
//
// ## Purpose
//
// The read handler publishes its computed attributes here and assigns the
// instance identifier. The store owns persistence; the read handler never
// reads back what it wrote.
//
// ## Write Checking
//
// Stores are built with the data source's schema and reject values that do
// not match the declared attribute shape. That rejection is what surfaces as
// `Error setting dns_records` from the read handler.
//
// ## Implementations
//
// - In-memory: `MemoryStateStore`
// - JSON file: `FileStateStore`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Point-in-time copy of an instance's state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Instance identifier, if one was assigned
    pub id: Option<String>,
    /// Stored attributes by key
    pub attributes: BTreeMap<String, Value>,
}

/// Trait for host state store implementations
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Store `value` under `key`
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Value accepted
    /// - `Err(Error)`: Value does not match the schema, or storage failed
    async fn set(&self, key: &str, value: Value) -> Result<(), crate::Error>;

    /// Get the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<Value>, crate::Error>;

    /// Assign the instance identifier
    async fn set_id(&self, id: &str) -> Result<(), crate::Error>;

    /// Get the instance identifier
    async fn id(&self) -> Result<Option<String>, crate::Error>;

    /// Copy of the full state
    async fn snapshot(&self) -> Result<StateSnapshot, crate::Error>;

    /// Persist any pending changes
    async fn flush(&self) -> Result<(), crate::Error>;
}
