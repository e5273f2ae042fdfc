//! # clientdb-api: HTTP Service for Client Records
//!
//! ## API Surface
//!
//! | Method   | Path                  | Module                    | Operation         |
//! |----------|-----------------------|---------------------------|-------------------|
//! | `GET`    | `/api/clients`        | [`routes::clients`]       | List              |
//! | `POST`   | `/api/clients`        | [`routes::clients`]       | Create / promote  |
//! | `POST`   | `/api/clients/draft`  | [`routes::clients`]       | Draft upsert      |
//! | `PUT`    | `/api/clients/{id}`   | [`routes::clients`]       | Update            |
//! | `DELETE` | `/api/clients/{id}`   | [`routes::clients`]       | Delete            |
//! | `GET`    | `/api/cif/{cif}`      | [`routes::reference`]     | Enrichment lookup |
//! | `GET`    | `/api/services`       | [`routes::reference`]     | Service catalog   |
//!
//! ## Middleware Stack
//!
//! ```text
//! TraceLayer → DefaultBodyLimit (1 MiB) → Handler
//! ```

pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Request body limit for every API route.
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::clients::router())
        .merge(routes::reference::router())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .with_state(state);

    Router::new().merge(health).merge(api)
}

/// Liveness probe. Always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. Loads the collection to confirm the store is readable.
async fn readiness(State(state): State<AppState>) -> Result<&'static str, AppError> {
    let store = state.store.clone();
    match tokio::task::spawn_blocking(move || store.list_clients()).await {
        Ok(Ok(_)) => Ok("ready"),
        Ok(Err(e)) => Err(AppError::ServiceUnavailable(format!(
            "client store unreadable: {e}"
        ))),
        Err(e) => Err(AppError::ServiceUnavailable(format!("readiness check failed: {e}"))),
    }
}
