// # Memory State Store
//
// In-memory implementation of StateStore.
//
// State lives for the lifetime of the store. Useful for tests and for hosts
// that hand the snapshot to their own persistence layer.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::schema::Schema;
use crate::traits::state_store::{StateSnapshot, StateStore};

/// In-memory state store implementation
///
/// Writes are checked against the schema the store was created with.
///
/// # Example
///
/// ```rust,no_run
/// use dnsrecords_core::data_source::dns_records_schema;
/// use dnsrecords_core::state::MemoryStateStore;
/// use dnsrecords_core::traits::StateStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryStateStore::new(dns_records_schema());
///
///     store.set("dns_records", serde_json::json!([])).await?;
///     assert_eq!(store.get("dns_records").await?, Some(serde_json::json!([])));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStateStore {
    schema: Arc<Schema>,
    inner: Arc<RwLock<StateSnapshot>>,
}

impl MemoryStateStore {
    /// Create a new empty memory state store
    pub fn new(schema: Schema) -> Self {
        Self {
            schema: Arc::new(schema),
            inner: Arc::new(RwLock::new(StateSnapshot::default())),
        }
    }

    /// Check if no attribute or id has been stored
    pub async fn is_empty(&self) -> bool {
        let guard = self.inner.read().await;
        guard.id.is_none() && guard.attributes.is_empty()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn set(&self, key: &str, value: Value) -> Result<(), Error> {
        self.schema.check_value(key, &value).map_err(Error::state_store)?;

        let mut guard = self.inner.write().await;
        guard.attributes.insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.attributes.get(key).cloned())
    }

    async fn set_id(&self, id: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.id = Some(id.to_string());
        Ok(())
    }

    async fn id(&self) -> Result<Option<String>, Error> {
        Ok(self.inner.read().await.id.clone())
    }

    async fn snapshot(&self) -> Result<StateSnapshot, Error> {
        Ok(self.inner.read().await.clone())
    }

    async fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, ValueType};
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new().with("count", Attribute::computed(ValueType::Int))
    }

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryStateStore::new(schema());
        assert!(store.is_empty().await);

        store.set("count", json!(3)).await.unwrap();
        store.set_id("instance").await.unwrap();

        assert!(!store.is_empty().await);
        assert_eq!(store.get("count").await.unwrap(), Some(json!(3)));
        assert_eq!(store.id().await.unwrap().as_deref(), Some("instance"));
    }

    #[tokio::test]
    async fn test_memory_store_rejects_mismatch() {
        let store = MemoryStateStore::new(schema());

        let err = store.set("count", json!("three")).await.unwrap_err();
        assert!(err.to_string().contains("count: expected int, got string"));
        assert!(store.is_empty().await);

        assert!(store.set("other", json!(1)).await.is_err());
    }

    #[test]
    fn test_memory_store_clones_share_state() {
        let store = MemoryStateStore::new(schema());
        let clone = store.clone();

        tokio_test::block_on(async {
            store.set("count", json!(1)).await.unwrap();
            assert_eq!(clone.get("count").await.unwrap(), Some(json!(1)));
        });
    }
}
