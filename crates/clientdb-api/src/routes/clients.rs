//! # Client Record API
//!
//! Thin transport over [`ClientStore`](clientdb_store::ClientStore).
//! Store operations do blocking file I/O under the store mutex, so each one
//! runs on the blocking pool via [`run_store`].

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use clientdb_core::{ClientError, ClientId, ClientRecord, ClientStatus};
use clientdb_store::{ClientStore, DeleteOutcome, WriteOutcome};

use crate::error::AppError;
use crate::extractors::extract_payload;
use crate::state::AppState;

/// Optional filter for `GET /api/clients`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// Build the client records router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/clients", get(list_clients).post(create_client))
        .route("/api/clients/draft", post(upsert_draft))
        .route("/api/clients/{id}", put(update_client).delete(delete_client))
}

/// Run a store operation on the blocking pool.
async fn run_store<T, F>(state: &AppState, op: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&ClientStore) -> Result<T, ClientError> + Send + 'static,
{
    let store = state.store.clone();
    let result = tokio::task::spawn_blocking(move || op(&store)).await?;
    result.map_err(AppError::from)
}

fn path_id(raw: &str) -> Result<ClientId, AppError> {
    ClientId::parse(raw)
        .ok_or_else(|| AppError::NotFound("client id must not be blank".to_string()))
}

/// GET /api/clients: The full collection in stored order.
async fn list_clients(
    State(state): State<AppState>,
    query: axum::extract::Query<ListQuery>,
) -> Result<Json<Vec<ClientRecord>>, AppError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ClientStatus>)
        .transpose()?;
    let mut clients = run_store(&state, |store| store.list_clients()).await?;
    if let Some(status) = status {
        clients.retain(|c| c.status == status);
    }
    Ok(Json(clients))
}

/// POST /api/clients: Create an active client or promote a draft.
async fn create_client(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<WriteOutcome>), AppError> {
    let payload = extract_payload(body)?;
    let outcome = run_store(&state, move |store| store.create_client(payload)).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// POST /api/clients/draft: Insert or refresh a draft.
async fn upsert_draft(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<WriteOutcome>, AppError> {
    let payload = extract_payload(body)?;
    let outcome = run_store(&state, move |store| store.upsert_draft(payload)).await?;
    Ok(Json(outcome))
}

/// PUT /api/clients/{id}: Merge a partial payload into an existing client.
async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let id = path_id(&id)?;
    let payload = extract_payload(body)?;
    run_store(&state, move |store| store.update_client(&id, payload)).await?;
    Ok(Json(json!({})))
}

/// DELETE /api/clients/{id}: Remove a client.
async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, AppError> {
    let id = path_id(&id)?;
    let outcome = run_store(&state, move |store| store.delete_client(&id)).await?;
    Ok(Json(outcome))
}
