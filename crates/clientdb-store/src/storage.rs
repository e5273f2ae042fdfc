//! # Storage Collaborators
//!
//! The store reads and writes the whole collection as one document through
//! [`ClientStorage`]. There is no per-record addressing.
//!
//! ## Document Layout
//!
//! ```json
//! [
//!   { "client": { "id": "…", "cif": "B12345678", "status": "active", … } },
//!   { "client": { … } }
//! ]
//! ```
//!
//! Records are read back as [`ClientPayload`]s because a document edited
//! outside the store may carry records without an id; the store repairs
//! those on load.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use clientdb_core::{ClientPayload, ClientRecord, StorageError};

/// Wrapper object around each persisted record.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClientEnvelope<T> {
    pub client: T,
}

/// Whole-document storage for the client collection.
pub trait ClientStorage: Send + Sync {
    /// Load every persisted record in stored order.
    ///
    /// A store that does not exist yet is an empty collection.
    fn load_all(&self) -> Result<Vec<ClientPayload>, StorageError>;

    /// Replace the persisted collection with `clients`.
    fn save_all(&self, clients: &[ClientRecord]) -> Result<(), StorageError>;
}

impl<T: ClientStorage + ?Sized> ClientStorage for Arc<T> {
    fn load_all(&self) -> Result<Vec<ClientPayload>, StorageError> {
        (**self).load_all()
    }

    fn save_all(&self, clients: &[ClientRecord]) -> Result<(), StorageError> {
        (**self).save_all(clients)
    }
}

fn decode(bytes: &[u8], path: &Path) -> Result<Vec<ClientPayload>, StorageError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let entries: Vec<ClientEnvelope<ClientPayload>> =
        serde_json::from_slice(bytes).map_err(|source| StorageError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(entries.into_iter().map(|e| e.client).collect())
}

fn encode(clients: &[ClientRecord]) -> Result<Vec<u8>, StorageError> {
    let entries: Vec<ClientEnvelope<&ClientRecord>> =
        clients.iter().map(|client| ClientEnvelope { client }).collect();
    let mut bytes = serde_json::to_vec_pretty(&entries)?;
    bytes.push(b'\n');
    Ok(bytes)
}

// -- JSON file ----------------------------------------------------------------

/// A pretty-printed JSON document on the local filesystem.
///
/// Saves write a sibling temporary file and rename it over the target, so
/// readers observe either the previous or the new document, never a
/// partial one.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the persisted document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "clients.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ClientStorage for JsonFileStorage {
    fn load_all(&self) -> Result<Vec<ClientPayload>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "client document absent, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };
        let clients = decode(&bytes, &self.path)?;
        tracing::debug!(path = %self.path.display(), count = clients.len(), "loaded client document");
        Ok(clients)
    }

    fn save_all(&self, clients: &[ClientRecord]) -> Result<(), StorageError> {
        let bytes = encode(clients)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let tmp = self.temp_path();
        {
            let mut file = fs::File::create(&tmp).map_err(|e| self.io_error(e))?;
            file.write_all(&bytes).map_err(|e| self.io_error(e))?;
            file.sync_all().map_err(|e| self.io_error(e))?;
        }
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), count = clients.len(), "saved client document");
        Ok(())
    }
}

// -- In-memory ----------------------------------------------------------------

/// In-process storage holding the document as a JSON value.
///
/// Goes through the same encode/decode path as [`JsonFileStorage`], so
/// it observes the same document semantics.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    document: Mutex<Option<Value>>,
    saves: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the storage with a raw document, bypassing normalization.
    pub fn with_document(document: Value) -> Self {
        Self {
            document: Mutex::new(Some(document)),
            saves: AtomicUsize::new(0),
        }
    }

    /// The current raw document, if anything has been stored.
    pub fn document(&self) -> Option<Value> {
        self.document.lock().clone()
    }

    /// Number of completed `save_all` calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl ClientStorage for MemoryStorage {
    fn load_all(&self) -> Result<Vec<ClientPayload>, StorageError> {
        let document = self.document.lock().clone();
        match document {
            None => Ok(Vec::new()),
            Some(value) => {
                let bytes = serde_json::to_vec(&value)?;
                decode(&bytes, Path::new("<memory>"))
            }
        }
    }

    fn save_all(&self, clients: &[ClientRecord]) -> Result<(), StorageError> {
        let bytes = encode(clients)?;
        let value: Value = serde_json::from_slice(&bytes)?;
        *self.document.lock() = Some(value);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
