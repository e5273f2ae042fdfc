//! # Reference Data
//!
//! Read-only datasets consulted alongside the client collection:
//!
//! - [`CifDirectory`]: enrichment records keyed by CIF, used to prefill a
//!   new client from its registration code.
//! - [`ServiceCatalog`]: the services a client can subscribe to.
//!
//! Both are loaded once and never mutated, so they can be shared between
//! request handlers without locking. A missing source file is an empty
//! dataset.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Failure loading a reference dataset.
#[derive(Error, Debug)]
pub enum ReferenceDataError {
    #[error("failed to read reference data {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reference data {path} is not valid: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read `path` and decode it, treating a missing file as `None`.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, ReferenceDataError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "reference data absent, using empty set");
            return Ok(None);
        }
        Err(source) => {
            return Err(ReferenceDataError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| ReferenceDataError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
}

// -- CIF directory ------------------------------------------------------------

/// Enrichment data for one CIF, returned verbatim.
pub type EnrichmentRecord = Map<String, Value>;

/// Enrichment records keyed by CIF.
#[derive(Debug, Clone, Default)]
pub struct CifDirectory {
    entries: BTreeMap<String, EnrichmentRecord>,
}

impl CifDirectory {
    /// Load a directory from a JSON object `{ "<cif>": { … }, … }`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReferenceDataError> {
        let path = path.as_ref();
        let entries: Option<Map<String, Value>> = read_json(path)?;
        let directory = Self::from_map(entries.unwrap_or_default());
        tracing::debug!(path = %path.display(), count = directory.len(), "loaded cif directory");
        Ok(directory)
    }

    /// Build a directory from an in-memory object. Non-object values are skipped.
    pub fn from_map(map: Map<String, Value>) -> Self {
        let entries = map
            .into_iter()
            .filter_map(|(cif, value)| match value {
                Value::Object(record) => Some((cif.trim().to_string(), record)),
                _ => None,
            })
            .filter(|(cif, _)| !cif.is_empty())
            .collect();
        Self { entries }
    }

    /// Look up the enrichment record for `cif`. Surrounding whitespace is ignored.
    pub fn lookup(&self, cif: &str) -> Option<&EnrichmentRecord> {
        self.entries.get(cif.trim())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// -- Service catalog ----------------------------------------------------------

/// One subscribable service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The ordered list of services offered to clients.
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    services: Vec<ServiceDescriptor>,
}

impl ServiceCatalog {
    /// Load a catalog from a JSON array of descriptors.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReferenceDataError> {
        let path = path.as_ref();
        let services: Option<Vec<ServiceDescriptor>> = read_json(path)?;
        let catalog = Self::new(services.unwrap_or_default());
        tracing::debug!(path = %path.display(), count = catalog.list().len(), "loaded service catalog");
        Ok(catalog)
    }

    pub fn new(services: Vec<ServiceDescriptor>) -> Self {
        Self { services }
    }

    pub fn list(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    /// Find a service by id.
    pub fn get(&self, id: &str) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|s| s.id == id)
    }
}
