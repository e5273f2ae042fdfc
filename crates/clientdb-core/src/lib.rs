//! # clientdb-core: Foundational Types for clientdb
//!
//! Defines the vocabulary shared by every other crate in the workspace:
//! client identities and CIF codes, UTC timestamps, the client record and
//! payload shapes, and the error hierarchy. It depends on no other
//! `clientdb-*` crate.
//!
//! ## Key Design Principles
//!
//! 1. **Newtypes for identifiers.** `ClientId` and `Cif` are distinct types;
//!    a CIF cannot be used where a record id is expected.
//!
//! 2. **Closed status enumeration.** `ClientStatus` is `Draft | Active`.
//!    Any other wire value is rejected when a payload is parsed.
//!
//! 3. **Injected entropy and time.** Identity generation and the current
//!    time are behind the `IdentityGenerator` and `Clock` traits so that
//!    normalization stays a pure function.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod client;
pub mod error;
pub mod identity;
pub mod temporal;

pub use client::{ClientPayload, ClientRecord, ClientStatus};
pub use error::{ClientError, StorageError};
pub use identity::{
    Cif, ClientId, IdentityGenerator, IdentityStrategy, TimestampIdentity, UuidIdentity,
};
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp};
