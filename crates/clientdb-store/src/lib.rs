//! # clientdb-store
//!
//! The client record store and its collaborators.
//!
//! - [`normalize`]: merges a proposed payload into a stored record.
//! - [`uniqueness`]: the CIF uniqueness rule.
//! - [`storage`]: whole-document persistence (`JsonFileStorage`, `MemoryStorage`).
//! - [`store`]: [`ClientStore`], the Create / Draft-Upsert / Update / Delete /
//!   List operations.
//! - [`reference`]: read-only CIF enrichment and service catalog data.
//!
//! Logging goes through `tracing`. Installing a subscriber is left to the
//! binary.

pub mod normalize;
pub mod reference;
pub mod storage;
pub mod store;
pub mod uniqueness;

#[cfg(test)]
mod testing;

pub use normalize::normalize;
pub use reference::{
    CifDirectory, EnrichmentRecord, ReferenceDataError, ServiceCatalog, ServiceDescriptor,
};
pub use storage::{ClientEnvelope, ClientStorage, JsonFileStorage, MemoryStorage};
pub use store::{ClientStore, DeleteOutcome, WriteOutcome};
pub use uniqueness::{ensure_unique, find_conflict};
