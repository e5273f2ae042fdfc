//! # Record Normalizer
//!
//! Merges a proposed [`ClientPayload`] into an optional stored
//! [`ClientRecord`], producing a complete record. Each field's precedence
//! is spelled out below.
//!
//! | Field            | Precedence                                          |
//! |------------------|-----------------------------------------------------|
//! | `id`             | proposed → existing → freshly generated             |
//! | `cif`            | proposed (non-blank) → existing                     |
//! | `status`         | proposed → existing → `active`                      |
//! | `services`       | proposed (array) → existing → empty                 |
//! | `bankAccounts`   | proposed (array) → existing → empty                 |
//! | `createdAt`      | proposed → existing → `now`                         |
//! | `draftUpdatedAt` | proposed → existing                                 |
//! | other attributes | shallow merge, proposed keys override existing keys |
//!
//! Omitting `services` or `bankAccounts` never clears a stored list.

use clientdb_core::{ClientPayload, ClientRecord, ClientStatus, IdentityGenerator, Timestamp};

/// Produce a complete record from a proposed payload and an optional stored record.
///
/// No I/O. The only effect is drawing a fresh id from `ids` when neither
/// side supplies one.
pub fn normalize(
    proposed: ClientPayload,
    existing: Option<&ClientRecord>,
    ids: &dyn IdentityGenerator,
    now: Timestamp,
) -> ClientRecord {
    let id = proposed
        .id
        .or_else(|| existing.map(|e| e.id.clone()))
        .unwrap_or_else(|| ids.generate());

    let cif = proposed.cif.or_else(|| existing.and_then(|e| e.cif.clone()));

    let status = proposed
        .status
        .or_else(|| existing.map(|e| e.status))
        .unwrap_or(ClientStatus::Active);

    let services = proposed
        .services
        .or_else(|| existing.map(|e| e.services.clone()))
        .unwrap_or_default();

    let bank_accounts = proposed
        .bank_accounts
        .or_else(|| existing.map(|e| e.bank_accounts.clone()))
        .unwrap_or_default();

    let created_at = proposed
        .created_at
        .or_else(|| existing.map(|e| e.created_at))
        .unwrap_or(now);

    let draft_updated_at = proposed
        .draft_updated_at
        .or_else(|| existing.and_then(|e| e.draft_updated_at));

    let mut attributes = existing.map(|e| e.attributes.clone()).unwrap_or_default();
    for (key, value) in proposed.attributes {
        attributes.insert(key, value);
    }

    ClientRecord {
        id,
        cif,
        status,
        services,
        bank_accounts,
        created_at,
        draft_updated_at,
        attributes,
    }
}
