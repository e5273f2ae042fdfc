//! # Reference Data API
//!
//! Read-only lookups against the CIF directory and the service catalog.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use clientdb_store::{EnrichmentRecord, ServiceDescriptor};

use crate::error::AppError;
use crate::state::AppState;

/// Build the reference data router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/cif/{cif}", get(lookup_cif))
        .route("/api/services", get(list_services))
}

/// GET /api/cif/{cif}: Enrichment record for a CIF.
async fn lookup_cif(
    State(state): State<AppState>,
    Path(cif): Path<String>,
) -> Result<Json<EnrichmentRecord>, AppError> {
    state
        .cif_directory
        .lookup(&cif)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no enrichment data for cif {}", cif.trim())))
}

/// GET /api/services: The service catalog.
async fn list_services(State(state): State<AppState>) -> Json<Vec<ServiceDescriptor>> {
    Json(state.services.list().to_vec())
}
