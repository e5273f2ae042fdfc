//! # Custom Extractors
//!
//! Helpers that turn axum JSON rejections into [`AppError`]s and parse
//! client payloads at the boundary.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value;

use clientdb_core::ClientPayload;

use crate::error::AppError;

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
///
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
///     // use req...
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and parse it as a [`ClientPayload`].
///
/// The body must be a JSON object. Field-level problems (unknown status,
/// non-string CIF, bad timestamp) surface as [`AppError::BadRequest`].
pub fn extract_payload(
    result: Result<Json<Value>, JsonRejection>,
) -> Result<ClientPayload, AppError> {
    let value = extract_json(result)?;
    ClientPayload::from_value(value).map_err(AppError::from)
}
