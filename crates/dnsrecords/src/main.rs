// # dnsrecords - DNS records data source host
//
// A THIN integration layer: it plays the role of the declarative host for
// one data source instance. All data source logic lives in dnsrecords-core.
//
// The binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Registering clients and building the shared API client
// 4. Running one read and printing the resulting state as JSON on stdout
//
// ## Configuration
//
// ### Client
// - `DNSRECORDS_PROVIDER_TYPE`: Client type (cloudflare, default)
// - `DNSRECORDS_API_TOKEN`: API token (required)
// - `DNSRECORDS_API_BASE_URL`: API base URL override (optional)
//
// ### Data source
// - `DNSRECORDS_ZONE_ID`: Zone to list records from (required)
// - `DNSRECORDS_NAME`: Record name filter (optional)
// - `DNSRECORDS_TYPE`: Record type filter (optional)
// - `DNSRECORDS_CONTENT`: Record content filter (optional)
//
// ### State
// - `DNSRECORDS_STATE_PATH`: Persist state to this JSON file (optional)
//
// ### Logging
// - `DNSRECORDS_LOG_LEVEL`: trace, debug, info (default), warn, error
//
// ## Example
//
// ```bash
// export DNSRECORDS_API_TOKEN=your_token
// export DNSRECORDS_ZONE_ID=023e105f4ecef8ad9ca31a8372d0c353
// export DNSRECORDS_TYPE=A
//
// dnsrecords > state.json
// ```

use anyhow::Result;
use dnsrecords_core::traits::{StateSnapshot, StateStore};
use dnsrecords_core::{
    ClientRegistry, DataSource, DnsRecordsDataSource, FileStateStore, MemoryStateStore,
    ProviderConfig,
};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Read succeeded
/// - 1: Configuration error
/// - 2: Runtime error (upstream or state failure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<HostExitCode> for ExitCode {
    fn from(code: HostExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Host configuration
#[derive(Debug, Clone, PartialEq, Eq)]
struct Config {
    provider_type: String,
    api_token: String,
    api_base_url: Option<String>,
    zone_id: String,
    name: Option<String>,
    record_type: Option<String>,
    content: Option<String>,
    state_path: Option<String>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`; empty values count as unset
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            provider_type: get("DNSRECORDS_PROVIDER_TYPE")
                .unwrap_or_else(|| "cloudflare".to_string()),
            api_token: get("DNSRECORDS_API_TOKEN")
                .ok_or_else(|| anyhow::anyhow!("DNSRECORDS_API_TOKEN is required"))?,
            api_base_url: get("DNSRECORDS_API_BASE_URL"),
            zone_id: get("DNSRECORDS_ZONE_ID").unwrap_or_default(),
            name: get("DNSRECORDS_NAME"),
            record_type: get("DNSRECORDS_TYPE"),
            content: get("DNSRECORDS_CONTENT"),
            state_path: get("DNSRECORDS_STATE_PATH"),
            log_level: get("DNSRECORDS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        let token_lower = self.api_token.to_lowercase();
        if token_lower.contains("your_token")
            || token_lower.contains("replace_me")
            || token_lower == "token"
        {
            anyhow::bail!(
                "DNSRECORDS_API_TOKEN appears to be a placeholder. \
                Use an actual API token from your DNS provider."
            );
        }

        match self.provider_type.as_str() {
            "cloudflare" => {}
            _ => anyhow::bail!(
                "DNSRECORDS_PROVIDER_TYPE '{}' is not supported. \
                Supported providers: cloudflare",
                self.provider_type
            ),
        }

        if self.zone_id.is_empty() {
            anyhow::bail!(
                "DNSRECORDS_ZONE_ID is required. \
                Set it via: export DNSRECORDS_ZONE_ID=your_zone_id"
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DNSRECORDS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        self.provider_config().validate()?;
        Ok(())
    }

    /// Client configuration handed to the registry
    fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::Cloudflare {
            api_token: self.api_token.clone(),
            base_url: self.api_base_url.clone(),
        }
    }

    /// Raw data source configuration, as a declarative host would hold it
    fn raw_config(&self) -> serde_json::Value {
        let mut raw = serde_json::Map::new();
        raw.insert("zone_id".to_string(), self.zone_id.clone().into());

        for (key, value) in [
            ("name", &self.name),
            ("type", &self.record_type),
            ("content", &self.content),
        ] {
            if let Some(value) = value {
                raw.insert(key.to_string(), value.clone().into());
            }
        }

        serde_json::Value::Object(raw)
    }

    fn tracing_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return HostExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return HostExitCode::ConfigError.into();
    }

    // stdout carries the state document, logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.tracing_level())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HostExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return HostExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(run(config)).and_then(|snapshot| {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        Ok(())
    });

    match result {
        Ok(()) => HostExitCode::Success.into(),
        Err(e) => {
            error!("Read failed: {}", e);
            exit_code_for(&e).into()
        }
    }
}

/// Classify a failed run
fn exit_code_for(err: &anyhow::Error) -> HostExitCode {
    match err.downcast_ref::<dnsrecords_core::Error>() {
        Some(dnsrecords_core::Error::Config(_)) => HostExitCode::ConfigError,
        _ => HostExitCode::RuntimeError,
    }
}

/// Build the client and state store, then run one read
async fn run(config: Config) -> Result<StateSnapshot> {
    let registry = ClientRegistry::new();

    #[cfg(feature = "cloudflare")]
    {
        info!("Registering Cloudflare client");
        dnsrecords_provider_cloudflare::register(&registry);
    }

    let client = registry.create_client(&config.provider_config())?;
    let source = DnsRecordsDataSource::new(client);

    let state: Box<dyn StateStore> = match &config.state_path {
        Some(path) => {
            info!("Persisting state to {}", path);
            Box::new(FileStateStore::new(path, source.schema()).await?)
        }
        None => Box::new(MemoryStateStore::new(source.schema())),
    };

    info!("Reading data source {} for zone {}", source.name(), config.zone_id);
    source.read(&config.raw_config(), state.as_ref()).await?;
    state.flush().await?;

    Ok(state.snapshot().await?)
}
