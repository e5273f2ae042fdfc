//! # CIF Uniqueness
//!
//! A CIF conflicts only when it collides with a *different* record's
//! identity. A record may always keep its own CIF, and an absent
//! candidate CIF never conflicts.

use clientdb_core::{Cif, ClientError, ClientId, ClientRecord};

/// Find the record that a commit of (`cif`, `id`) would collide with.
///
/// Returns the first record `X` with `X.cif == cif` and, when `id` is
/// given, `X.id != id`.
pub fn find_conflict<'a>(
    clients: &'a [ClientRecord],
    cif: Option<&Cif>,
    id: Option<&ClientId>,
) -> Option<&'a ClientRecord> {
    let cif = cif?;
    clients.iter().find(|existing| {
        existing.cif.as_ref() == Some(cif) && id.map_or(true, |id| &existing.id != id)
    })
}

/// Fail with [`ClientError::Conflict`] if committing (`cif`, `id`) would
/// violate CIF uniqueness.
pub fn ensure_unique(
    clients: &[ClientRecord],
    cif: Option<&Cif>,
    id: Option<&ClientId>,
) -> Result<(), ClientError> {
    match find_conflict(clients, cif, id) {
        Some(holder) => Err(ClientError::Conflict(format!(
            "cif {} is already registered to client {}",
            holder.cif.as_ref().map(Cif::as_str).unwrap_or_default(),
            holder.id
        ))),
        None => Ok(()),
    }
}
