//! # Error Types
//!
//! Request-level outcomes of store operations ([`ClientError`]) and
//! failures of the durable storage collaborator ([`StorageError`]).
//!
//! None of these are transient. They are reported to the immediate caller
//! and never retried. A corrupt persisted document is a [`StorageError`],
//! not an empty collection.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by client store operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// A required field is missing or blank.
    #[error("validation error: {0}")]
    Validation(String),

    /// The CIF belongs to a different client, or a draft upsert targeted
    /// an active record.
    #[error("conflict: {0}")]
    Conflict(String),

    /// No record with the requested id.
    #[error("not found: {0}")]
    NotFound(String),

    /// The payload could not be interpreted as a client record.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The storage collaborator failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Failure to read or write the persisted collection.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The document could not be read or written.
    #[error("io error on {path}: {source}")]
    Io {
        /// Path of the persisted document.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document exists but is not a valid client collection.
    #[error("corrupt client document {path}: {source}")]
    Corrupt {
        /// Path of the persisted document.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The collection could not be encoded.
    #[error("failed to encode client collection: {0}")]
    Encode(#[from] serde_json::Error),
}
