// # File State Store
//
// File-backed implementation of StateStore.
//
// ## Persistence
//
// - Writes are buffered in memory and persisted on `flush()`
// - Atomic writes: write-then-rename, so readers never see a torn file
// - A corrupted or unreadable-as-JSON file is discarded with a warning; data
//   source state is recomputed on every read, so nothing is lost
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "id": "2021-01-02 03:04:05.123456789 UTC",
//   "attributes": {
//     "dns_records": [ ... ]
//   }
// }
// ```

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::Error;
use crate::schema::Schema;
use crate::traits::state_store::{StateSnapshot, StateStore};

/// State file format version
const STATE_FILE_VERSION: &str = "1.0";

/// File-backed state store
///
/// # Example
///
/// ```rust,no_run
/// use dnsrecords_core::data_source::dns_records_schema;
/// use dnsrecords_core::state::FileStateStore;
/// use dnsrecords_core::traits::StateStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileStateStore::new("/var/lib/dnsrecords/state.json", dns_records_schema()).await?;
///
///     store.set("dns_records", serde_json::json!([])).await?;
///     store.flush().await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
    schema: Arc<Schema>,
    state: Arc<RwLock<FileState>>,
}

#[derive(Debug)]
struct FileState {
    snapshot: StateSnapshot,
    dirty: bool,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct StateFileFormat {
    version: String,
    #[serde(flatten)]
    snapshot: StateSnapshot,
}

impl FileStateStore {
    /// Create or load a file state store
    ///
    /// Parent directories are created if needed.
    pub async fn new<P: AsRef<Path>>(path: P, schema: Schema) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create state directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let snapshot = Self::load_state(&path).await?;

        Ok(Self {
            path,
            schema: Arc::new(schema),
            state: Arc::new(RwLock::new(FileState {
                snapshot,
                dirty: false,
            })),
        })
    }

    async fn load_state(path: &Path) -> Result<StateSnapshot, Error> {
        if !path.exists() {
            tracing::debug!("State file does not exist: {}", path.display());
            return Ok(StateSnapshot::default());
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            Error::state_store(format!(
                "Failed to read state file {}: {}",
                path.display(),
                e
            ))
        })?;

        let state_file: StateFileFormat = match serde_json::from_str(&content) {
            Ok(state_file) => state_file,
            Err(e) => {
                tracing::warn!(
                    "State file {} is corrupted: {}. Starting with empty state.",
                    path.display(),
                    e
                );
                return Ok(StateSnapshot::default());
            }
        };

        if state_file.version != STATE_FILE_VERSION {
            tracing::warn!(
                "State file version mismatch: expected {}, got {}. \
                Attempting to load anyway.",
                STATE_FILE_VERSION,
                state_file.version
            );
        }

        tracing::debug!(
            "Loaded state from file: {} attribute(s)",
            state_file.snapshot.attributes.len()
        );
        Ok(state_file.snapshot)
    }

    async fn write_state(&self) -> Result<(), Error> {
        let mut state_guard = self.state.write().await;

        let state_file = StateFileFormat {
            version: STATE_FILE_VERSION.to_string(),
            snapshot: state_guard.snapshot.clone(),
        };

        let json = serde_json::to_string_pretty(&state_file)
            .map_err(|e| Error::state_store(format!("Failed to serialize state: {}", e)))?;

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::state_store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        state_guard.dirty = false;

        tracing::trace!("State written to file: {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn set(&self, key: &str, value: Value) -> Result<(), Error> {
        self.schema.check_value(key, &value).map_err(Error::state_store)?;

        let mut state_guard = self.state.write().await;
        state_guard.snapshot.attributes.insert(key.to_string(), value);
        state_guard.dirty = true;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, Error> {
        let state_guard = self.state.read().await;
        Ok(state_guard.snapshot.attributes.get(key).cloned())
    }

    async fn set_id(&self, id: &str) -> Result<(), Error> {
        let mut state_guard = self.state.write().await;
        state_guard.snapshot.id = Some(id.to_string());
        state_guard.dirty = true;
        Ok(())
    }

    async fn id(&self) -> Result<Option<String>, Error> {
        Ok(self.state.read().await.snapshot.id.clone())
    }

    async fn snapshot(&self) -> Result<StateSnapshot, Error> {
        Ok(self.state.read().await.snapshot.clone())
    }

    async fn flush(&self) -> Result<(), Error> {
        let dirty = self.state.read().await.dirty;
        if dirty {
            self.write_state().await
        } else {
            Ok(())
        }
    }
}
