//! Plugin-based client registry
//!
//! The registry allows DNS API clients to be registered dynamically at
//! runtime, so the host builds its shared client from configuration without
//! hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dnsrecords_core::registry::ClientRegistry;
//! use dnsrecords_core::config::ProviderConfig;
//!
//! let registry = ClientRegistry::new();
//! dnsrecords_provider_cloudflare::register(&registry);
//!
//! let config = ProviderConfig::Cloudflare { api_token, base_url: None };
//! let client = registry.create_client(&config)?;
//! ```

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::traits::{DnsRecordsClient, DnsRecordsClientFactory};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Registry of DNS API client factories, keyed by provider type name
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ClientRegistry {
    clients: RwLock<HashMap<String, Box<dyn DnsRecordsClientFactory>>>,
}

impl ClientRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client factory
    ///
    /// Registering the same name twice replaces the earlier factory.
    pub fn register_client(&self, name: impl Into<String>, factory: Box<dyn DnsRecordsClientFactory>) {
        let mut clients = self.clients.write().unwrap_or_else(PoisonError::into_inner);
        clients.insert(name.into(), factory);
    }

    /// Validate `config` and create the shared client it describes
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn DnsRecordsClient>)`: Created client
    /// - `Err(Error)`: Invalid config, unknown type, or factory failure
    pub fn create_client(&self, config: &ProviderConfig) -> Result<Arc<dyn DnsRecordsClient>> {
        config.validate()?;

        let client_type = config.type_name();
        let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);

        let factory = clients
            .get(client_type)
            .ok_or_else(|| Error::config(format!("Unknown provider type: {}", client_type)))?;

        tracing::debug!("Creating {} client", client_type);
        factory.create(config).map(Arc::from)
    }

    /// List all registered client types
    pub fn list_clients(&self) -> Vec<String> {
        let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);
        clients.keys().cloned().collect()
    }

    /// Check if a client type is registered
    pub fn has_client(&self, name: &str) -> bool {
        let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);
        clients.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{DnsRecord, RecordFilter};
    use async_trait::async_trait;

    struct EmptyClient;

    #[async_trait]
    impl DnsRecordsClient for EmptyClient {
        async fn list_dns_records(&self, _filter: &RecordFilter) -> Result<Vec<DnsRecord>> {
            Ok(Vec::new())
        }

        fn client_name(&self) -> &'static str {
            "empty"
        }
    }

    struct EmptyClientFactory;

    impl DnsRecordsClientFactory for EmptyClientFactory {
        fn create(&self, _config: &ProviderConfig) -> Result<Box<dyn DnsRecordsClient>> {
            Ok(Box::new(EmptyClient))
        }
    }

    fn custom(factory: &str) -> ProviderConfig {
        ProviderConfig::Custom {
            factory: factory.to_string(),
            config: serde_json::json!({}),
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = ClientRegistry::new();
        assert!(!registry.has_client("empty"));

        registry.register_client("empty", Box::new(EmptyClientFactory));

        assert!(registry.has_client("empty"));
        assert!(registry.list_clients().contains(&"empty".to_string()));

        let client = registry.create_client(&custom("empty")).unwrap();
        assert_eq!(client.client_name(), "empty");
    }

    #[test]
    fn test_unknown_type_is_config_error() {
        let registry = ClientRegistry::new();
        let err = registry.create_client(&custom("missing")).err().unwrap();
        assert!(matches!(err, Error::Config(ref m) if m.contains("missing")));
    }

    #[test]
    fn test_invalid_config_is_rejected_before_lookup() {
        let registry = ClientRegistry::new();
        registry.register_client("cloudflare", Box::new(EmptyClientFactory));

        assert!(registry.create_client(&ProviderConfig::default()).is_err());
    }
}
