//! Error types for the DNS records data source
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for data source operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DNS records data source
#[derive(Error, Debug)]
pub enum Error {
    /// The upstream "list DNS records" call failed
    #[error("error listing DNS Records: {0}")]
    ListRecords(String),

    /// The host state store rejected the computed `dns_records`
    #[error("Error setting dns_records: {0}")]
    SetState(String),

    /// Configuration errors (including schema validation failures)
    #[error("Configuration error: {0}")]
    Config(String),

    /// State store-related errors
    #[error("State store error: {0}")]
    StateStore(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors (from provider APIs)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Zone or record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Wrap an upstream failure as a listing error
    pub fn list_records(source: impl std::fmt::Display) -> Self {
        Self::ListRecords(source.to_string())
    }

    /// Wrap a state store rejection as a `dns_records` write error
    pub fn set_state(source: impl std::fmt::Display) -> Self {
        Self::SetState(source.to_string())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a state store error
    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::StateStore(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}
