//! # API Route Modules
//!
//! - `clients`: client record CRUD and the draft lifecycle.
//! - `reference`: CIF enrichment lookup and the service catalog.

pub mod clients;
pub mod reference;
