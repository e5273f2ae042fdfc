//! # Application State
//!
//! Shared state handed to every handler. The client store serializes its
//! own operations; the reference datasets are immutable after startup.

use std::path::PathBuf;
use std::sync::Arc;

use clientdb_core::IdentityStrategy;
use clientdb_store::{
    CifDirectory, ClientStore, JsonFileStorage, ReferenceDataError, ServiceCatalog,
};

/// Default location of the client document.
pub const DEFAULT_DB_PATH: &str = "data/clients.json";

/// Runtime configuration, read from the environment.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Path of the persisted client document.
    pub db_path: PathBuf,
    /// Optional CIF enrichment table.
    pub cif_directory_path: Option<PathBuf>,
    /// Optional service catalog.
    pub service_catalog_path: Option<PathBuf>,
    /// Generator for ids the store assigns.
    pub id_strategy: IdentityStrategy,
}

impl AppConfig {
    /// Build configuration from `PORT`, `CLIENTS_DB_PATH`,
    /// `CIF_DIRECTORY_PATH`, `SERVICE_CATALOG_PATH` and `CLIENT_ID_STRATEGY`.
    ///
    /// An unparseable `CLIENT_ID_STRATEGY` logs a warning and falls back to
    /// `uuid`.
    pub fn from_env() -> Self {
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let db_path = std::env::var("CLIENTS_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH));

        Self {
            port,
            db_path,
            cif_directory_path: env_path("CIF_DIRECTORY_PATH"),
            service_catalog_path: env_path("SERVICE_CATALOG_PATH"),
            id_strategy: std::env::var("CLIENT_ID_STRATEGY")
                .ok()
                .map(|raw| parse_id_strategy(&raw))
                .unwrap_or_default(),
        }
    }
}

fn parse_id_strategy(raw: &str) -> IdentityStrategy {
    raw.parse().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring CLIENT_ID_STRATEGY");
        IdentityStrategy::default()
    })
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("db_path", &self.db_path.display())
            .field(
                "cif_directory_path",
                &self.cif_directory_path.as_ref().map(|p| p.display().to_string()),
            )
            .field(
                "service_catalog_path",
                &self.service_catalog_path.as_ref().map(|p| p.display().to_string()),
            )
            .field("id_strategy", &self.id_strategy.as_str())
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            cif_directory_path: None,
            service_catalog_path: None,
            id_strategy: IdentityStrategy::default(),
        }
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<ClientStore>,
    pub cif_directory: Arc<CifDirectory>,
    pub services: Arc<ServiceCatalog>,
    pub config: AppConfig,
}

impl AppState {
    /// Assemble state from explicit parts.
    pub fn new(store: ClientStore, cif_directory: CifDirectory, services: ServiceCatalog) -> Self {
        Self {
            store: Arc::new(store),
            cif_directory: Arc::new(cif_directory),
            services: Arc::new(services),
            config: AppConfig::default(),
        }
    }

    /// Open the file-backed store and load reference data named by `config`.
    pub fn from_config(config: AppConfig) -> Result<Self, ReferenceDataError> {
        let store = ClientStore::new(JsonFileStorage::new(&config.db_path))
            .with_identity_generator(config.id_strategy);
        let cif_directory = match &config.cif_directory_path {
            Some(path) => CifDirectory::load(path)?,
            None => CifDirectory::default(),
        };
        let services = match &config.service_catalog_path {
            Some(path) => ServiceCatalog::load(path)?,
            None => ServiceCatalog::default(),
        };
        tracing::info!(
            db_path = %config.db_path.display(),
            id_strategy = %config.id_strategy,
            cif_entries = cif_directory.len(),
            services = services.list().len(),
            "application state ready"
        );
        Ok(Self {
            store: Arc::new(store),
            cif_directory: Arc::new(cif_directory),
            services: Arc::new(services),
            config,
        })
    }
}
