//! # Client Record Store
//!
//! Owns the client collection and exposes the five store operations.
//! Every mutating operation is one load → check → normalize → mutate →
//! persist cycle over the whole collection.
//!
//! ## Lifecycle
//!
//! ```text
//!   upsert_draft ──▶ Draft ──▶ create (match by id, or by CIF-with-draft) ──▶ Active
//!                                                              create ──▶ Active
//! ```
//!
//! `update_client` keeps the stored status, so an active record is never
//! demoted back to draft. `delete_client` is the only way a record leaves
//! the collection.
//!
//! ## Concurrency
//!
//! The storage collaborator gives no mutual exclusion between a load and
//! the following save. Two unserialized writers would each load the same
//! snapshot and the second save would drop the first writer's change. All
//! operations therefore run under a single `parking_lot::Mutex`. The lock
//! is synchronous and must never be held across an `.await`.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use clientdb_core::{
    ClientError, ClientId, ClientPayload, ClientRecord, ClientStatus, Clock, IdentityGenerator,
    SystemClock, UuidIdentity,
};

use crate::normalize::normalize;
use crate::storage::ClientStorage;
use crate::uniqueness::ensure_unique;

/// Result of a create or draft upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOutcome {
    /// Id of the record that was written.
    pub id: ClientId,
    /// Collection size after the write.
    pub count: usize,
}

/// Result of a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    /// Collection size after the delete.
    pub count: usize,
}

/// The client record store.
pub struct ClientStore {
    storage: Box<dyn ClientStorage>,
    ids: Box<dyn IdentityGenerator>,
    clock: Box<dyn Clock>,
    lock: Mutex<()>,
}

impl std::fmt::Debug for ClientStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientStore").finish_non_exhaustive()
    }
}

impl ClientStore {
    /// A store over `storage` with UUID identities and the system clock.
    pub fn new(storage: impl ClientStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
            ids: Box::new(UuidIdentity),
            clock: Box::new(SystemClock),
            lock: Mutex::new(()),
        }
    }

    /// Replace the identity generator.
    pub fn with_identity_generator(mut self, ids: impl IdentityGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Return the full collection in stored order.
    pub fn list_clients(&self) -> Result<Vec<ClientRecord>, ClientError> {
        let _guard = self.lock.lock();
        self.load()
    }

    /// Create an active client, promoting a matching draft if there is one.
    ///
    /// The target is the record with the payload's id if one is given,
    /// otherwise the draft holding the payload's CIF. Without a target a new
    /// record is appended.
    pub fn create_client(&self, mut payload: ClientPayload) -> Result<WriteOutcome, ClientError> {
        let _guard = self.lock.lock();
        let mut clients = self.load()?;

        let target = match &payload.id {
            Some(id) => position_by_id(&clients, id),
            None => payload.cif.as_ref().and_then(|cif| {
                clients
                    .iter()
                    .position(|c| c.cif.as_ref() == Some(cif) && c.is_draft())
            }),
        };

        let candidate_id = payload
            .id
            .clone()
            .or_else(|| target.map(|i| clients[i].id.clone()));
        ensure_unique(&clients, payload.cif.as_ref(), candidate_id.as_ref())?;

        payload.status = Some(ClientStatus::Active);
        let now = self.clock.now();
        let outcome = match target {
            Some(index) => {
                payload.created_at = None;
                let mut record = normalize(payload, Some(&clients[index]), &*self.ids, now);
                record.draft_updated_at = None;
                let promoted = clients[index].is_draft();
                let id = record.id.clone();
                clients[index] = record;
                self.save(&clients)?;
                if promoted {
                    tracing::info!(client_id = %id, count = clients.len(), "promoted draft client to active");
                } else {
                    tracing::info!(client_id = %id, count = clients.len(), "rewrote active client");
                }
                WriteOutcome { id, count: clients.len() }
            }
            None => {
                let mut record = normalize(payload, None, &*self.ids, now);
                record.draft_updated_at = None;
                let id = record.id.clone();
                clients.push(record);
                self.save(&clients)?;
                tracing::info!(client_id = %id, count = clients.len(), "created client");
                WriteOutcome { id, count: clients.len() }
            }
        };
        Ok(outcome)
    }

    /// Insert or refresh a draft.
    ///
    /// The CIF is required. The target is matched by id if one is given,
    /// otherwise by CIF. An active target is rejected.
    pub fn upsert_draft(&self, mut payload: ClientPayload) -> Result<WriteOutcome, ClientError> {
        let cif = payload
            .cif
            .clone()
            .ok_or_else(|| ClientError::Validation("cif is required for a draft".to_string()))?;

        let _guard = self.lock.lock();
        let mut clients = self.load()?;

        let target = match &payload.id {
            Some(id) => position_by_id(&clients, id),
            None => clients.iter().position(|c| c.cif.as_ref() == Some(&cif)),
        };

        let candidate_id = payload
            .id
            .clone()
            .or_else(|| target.map(|i| clients[i].id.clone()));
        ensure_unique(&clients, Some(&cif), candidate_id.as_ref())?;

        if let Some(index) = target {
            if !clients[index].is_draft() {
                return Err(ClientError::Conflict(format!(
                    "client {} is already active and cannot be saved as a draft",
                    clients[index].id
                )));
            }
        }

        payload.status = Some(ClientStatus::Draft);
        let now = self.clock.now();
        let existing = target.map(|i| &clients[i]);
        if existing.is_some() {
            payload.created_at = None;
        }
        let mut record = normalize(payload, existing, &*self.ids, now);
        record.draft_updated_at = Some(now);
        let id = record.id.clone();

        match target {
            Some(index) => clients[index] = record,
            None => clients.push(record),
        }
        self.save(&clients)?;
        tracing::info!(client_id = %id, count = clients.len(), "saved draft client");
        Ok(WriteOutcome { id, count: clients.len() })
    }

    /// Merge `payload` into the record with `id`.
    ///
    /// The record keeps its id, status and creation time whatever the
    /// payload says. A non-blank payload CIF must not belong to another
    /// record.
    pub fn update_client(
        &self,
        id: &ClientId,
        mut payload: ClientPayload,
    ) -> Result<(), ClientError> {
        let _guard = self.lock.lock();
        let mut clients = self.load()?;

        let index = position_by_id(&clients, id)
            .ok_or_else(|| ClientError::NotFound(format!("client {id} not found")))?;

        ensure_unique(&clients, payload.cif.as_ref(), Some(id))?;

        if let Some(requested) = payload.id.as_ref().filter(|requested| *requested != id) {
            tracing::debug!(client_id = %id, requested = %requested, "ignoring payload id on update");
        }
        payload.id = Some(id.clone());
        payload.status = Some(clients[index].status);
        payload.created_at = None;

        let now = self.clock.now();
        let mut record = normalize(payload, Some(&clients[index]), &*self.ids, now);
        record.draft_updated_at = if record.is_draft() { Some(now) } else { None };
        clients[index] = record;

        self.save(&clients)?;
        tracing::info!(client_id = %id, "updated client");
        Ok(())
    }

    /// Remove the record with `id`.
    pub fn delete_client(&self, id: &ClientId) -> Result<DeleteOutcome, ClientError> {
        let _guard = self.lock.lock();
        let mut clients = self.load()?;

        let index = position_by_id(&clients, id)
            .ok_or_else(|| ClientError::NotFound(format!("client {id} not found")))?;
        clients.remove(index);

        self.save(&clients)?;
        tracing::info!(client_id = %id, count = clients.len(), "deleted client");
        Ok(DeleteOutcome { count: clients.len() })
    }

    /// Load and normalize the collection, repairing records without an id or
    /// `createdAt`.
    ///
    /// Caller must hold `self.lock`.
    fn load(&self) -> Result<Vec<ClientRecord>, ClientError> {
        let raw = self.storage.load_all()?;
        let now = self.clock.now();

        let mut repaired = 0usize;
        let clients: Vec<ClientRecord> = raw
            .into_iter()
            .map(|payload| {
                if payload.id.is_none() || payload.created_at.is_none() {
                    repaired += 1;
                }
                normalize(payload, None, &*self.ids, now)
            })
            .collect();

        if repaired > 0 {
            tracing::warn!(
                repaired,
                count = clients.len(),
                "filled in missing id or createdAt on stored clients"
            );
            self.save(&clients)?;
        }
        Ok(clients)
    }

    fn save(&self, clients: &[ClientRecord]) -> Result<(), ClientError> {
        self.storage.save_all(clients).map_err(ClientError::from)
    }
}

fn position_by_id(clients: &[ClientRecord], id: &ClientId) -> Option<usize> {
    clients.iter().position(|c| &c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::testing::SequentialIdentity;
    use std::sync::Arc;
    use clientdb_core::{ManualClock, Timestamp};
    use serde_json::{json, Value};

    struct Harness {
        store: ClientStore,
        storage: Arc<MemoryStorage>,
        clock: Arc<ManualClock>,
    }

    fn start() -> Timestamp {
        Timestamp::parse("2026-03-10T08:00:00Z").unwrap()
    }

    fn harness_with(storage: MemoryStorage) -> Harness {
        let storage = Arc::new(storage);
        let clock = Arc::new(ManualClock::starting_at(start()));
        let store = ClientStore::new(Arc::clone(&storage))
            .with_identity_generator(SequentialIdentity::default())
            .with_clock(Arc::clone(&clock));
        Harness { store, storage, clock }
    }

    fn harness() -> Harness {
        harness_with(MemoryStorage::new())
    }

    fn payload(value: Value) -> ClientPayload {
        ClientPayload::from_value(value).unwrap()
    }

    fn id(s: &str) -> ClientId {
        ClientId::parse(s).unwrap()
    }

    // ── Create ──────────────────────────────────────────────────────

    #[test]
    fn create_fills_defaults() {
        let h = harness();
        let out = h.store.create_client(payload(json!({"cif": "C1"}))).unwrap();
        assert_eq!(out, WriteOutcome { id: id("client-1"), count: 1 });

        let clients = h.store.list_clients().unwrap();
        assert_eq!(clients.len(), 1);
        let c = &clients[0];
        assert_eq!(c.cif.as_ref().unwrap().as_str(), "C1");
        assert_eq!(c.status, ClientStatus::Active);
        assert_eq!(c.created_at, start());
        assert!(c.services.is_empty());
        assert!(c.bank_accounts.is_empty());
        assert!(c.draft_updated_at.is_none());
    }

    #[test]
    fn create_ignores_requested_draft_status() {
        let h = harness();
        h.store
            .create_client(payload(json!({"cif": "C1", "status": "draft"})))
            .unwrap();
        assert_eq!(h.store.list_clients().unwrap()[0].status, ClientStatus::Active);
    }

    #[test]
    fn create_with_duplicate_cif_conflicts_and_leaves_collection_unchanged() {
        let h = harness();
        h.store.create_client(payload(json!({"cif": "C1", "name": "first"}))).unwrap();
        let before = h.storage.document();
        let saves = h.storage.save_count();

        let err = h
            .store
            .create_client(payload(json!({"cif": "C1", "name": "second"})))
            .unwrap_err();
        assert!(matches!(err, ClientError::Conflict(_)), "got: {err:?}");
        assert_eq!(h.storage.document(), before);
        assert_eq!(h.storage.save_count(), saves);
        assert_eq!(h.store.list_clients().unwrap().len(), 1);
    }

    #[test]
    fn create_with_cif_of_other_record_by_id_conflicts() {
        let h = harness();
        h.store.create_client(payload(json!({"cif": "C1"}))).unwrap();
        h.store.create_client(payload(json!({"cif": "C2"}))).unwrap();
        let err = h
            .store
            .create_client(payload(json!({"id": "client-2", "cif": "C1"})))
            .unwrap_err();
        assert!(matches!(err, ClientError::Conflict(_)));
    }

    #[test]
    fn create_with_unknown_id_inserts_with_that_id() {
        let h = harness();
        let out = h
            .store
            .create_client(payload(json!({"id": "external-7", "cif": "C1"})))
            .unwrap();
        assert_eq!(out.id.as_str(), "external-7");
        assert_eq!(out.count, 1);
    }

    #[test]
    fn create_by_id_rewrites_active_record_in_place() {
        let h = harness();
        h.store.create_client(payload(json!({"cif": "C1"}))).unwrap();
        h.store.create_client(payload(json!({"cif": "C2"}))).unwrap();
        let out = h
            .store
            .create_client(payload(json!({"id": "client-1", "cif": "C1", "name": "Acme"})))
            .unwrap();
        assert_eq!(out.count, 2);
        let clients = h.store.list_clients().unwrap();
        assert_eq!(clients[0].id.as_str(), "client-1");
        assert_eq!(clients[0].attributes["name"], json!("Acme"));
    }

    // ── Draft ───────────────────────────────────────────────────────

    #[test]
    fn draft_requires_cif() {
        let h = harness();
        let err = h.store.upsert_draft(payload(json!({"name": "x"}))).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        let err = h.store.upsert_draft(payload(json!({"cif": "  "}))).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(h.storage.save_count(), 0);
    }

    #[test]
    fn draft_twice_updates_same_record_and_refreshes_timestamp() {
        let h = harness();
        let first = h.store.upsert_draft(payload(json!({"cif": "D1", "step": 1}))).unwrap();
        let stamp1 = h.store.list_clients().unwrap()[0].draft_updated_at.unwrap();

        h.clock.advance_millis(5_000);
        let second = h.store.upsert_draft(payload(json!({"cif": "D1", "step": 2}))).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.count, 1);
        let clients = h.store.list_clients().unwrap();
        assert_eq!(clients.len(), 1);
        let stamp2 = clients[0].draft_updated_at.unwrap();
        assert!(stamp2 > stamp1);
        assert_eq!(clients[0].created_at, start());
        assert_eq!(clients[0].attributes["step"], json!(2));
        assert_eq!(clients[0].status, ClientStatus::Draft);
    }

    #[test]
    fn draft_against_active_record_conflicts() {
        let h = harness();
        h.store.create_client(payload(json!({"cif": "A1"}))).unwrap();
        let err = h.store.upsert_draft(payload(json!({"cif": "A1"}))).unwrap_err();
        assert!(matches!(err, ClientError::Conflict(_)));
        assert_eq!(h.store.list_clients().unwrap()[0].status, ClientStatus::Active);
    }

    #[test]
    fn draft_by_id_against_active_record_conflicts() {
        let h = harness();
        let out = h.store.create_client(payload(json!({"cif": "A1"}))).unwrap();
        let err = h
            .store
            .upsert_draft(payload(json!({"id": out.id.as_str(), "cif": "A1"})))
            .unwrap_err();
        assert!(matches!(err, ClientError::Conflict(_)));
    }

    #[test]
    fn draft_with_cif_of_other_record_conflicts() {
        let h = harness();
        h.store.upsert_draft(payload(json!({"cif": "D1"}))).unwrap();
        let other = h.store.upsert_draft(payload(json!({"cif": "D2"}))).unwrap();
        let err = h
            .store
            .upsert_draft(payload(json!({"id": other.id.as_str(), "cif": "D1"})))
            .unwrap_err();
        assert!(matches!(err, ClientError::Conflict(_)));
    }

    #[test]
    fn draft_id_match_takes_priority_over_cif() {
        let h = harness();
        let a = h.store.upsert_draft(payload(json!({"cif": "D1"}))).unwrap();
        // Changing the CIF of draft `a` via its id rewrites `a`.
        let out = h
            .store
            .upsert_draft(payload(json!({"id": a.id.as_str(), "cif": "D9"})))
            .unwrap();
        assert_eq!(out.id, a.id);
        let clients = h.store.list_clients().unwrap();
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].cif.as_ref().unwrap().as_str(), "D9");
    }

    // ── Promotion ───────────────────────────────────────────────────

    #[test]
    fn create_promotes_draft_by_cif() {
        let h = harness();
        let draft = h
            .store
            .upsert_draft(payload(json!({"cif": "X", "services": ["s1"]})))
            .unwrap();
        h.clock.advance_millis(60_000);
        let created = h.store.create_client(payload(json!({"cif": "X"}))).unwrap();

        assert_eq!(created.id, draft.id);
        assert_eq!(created.count, 1);
        let clients = h.store.list_clients().unwrap();
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].status, ClientStatus::Active);
        assert!(clients[0].draft_updated_at.is_none());
        assert_eq!(clients[0].created_at, start());
        assert_eq!(clients[0].services, vec![json!("s1")]);

        let doc = h.storage.document().unwrap();
        assert_eq!(doc[0]["client"]["draftUpdatedAt"], Value::Null);
    }

    #[test]
    fn create_promotes_draft_by_id() {
        let h = harness();
        let draft = h.store.upsert_draft(payload(json!({"cif": "X"}))).unwrap();
        let created = h
            .store
            .create_client(payload(json!({"id": draft.id.as_str(), "cif": "X", "name": "Final"})))
            .unwrap();
        assert_eq!(created.id, draft.id);
        let c = &h.store.list_clients().unwrap()[0];
        assert_eq!(c.status, ClientStatus::Active);
        assert_eq!(c.attributes["name"], json!("Final"));
    }

    // ── Update ──────────────────────────────────────────────────────

    #[test]
    fn update_with_empty_payload_keeps_lists() {
        let h = harness();
        let out = h
            .store
            .create_client(payload(json!({"cif": "U1", "services": ["A", "B"]})))
            .unwrap();
        h.store.update_client(&out.id, ClientPayload::default()).unwrap();
        assert_eq!(
            h.store.list_clients().unwrap()[0].services,
            vec![json!("A"), json!("B")]
        );
    }

    #[test]
    fn update_pins_id_to_path() {
        let h = harness();
        let out = h.store.create_client(payload(json!({"cif": "U1"}))).unwrap();
        h.store
            .update_client(&out.id, payload(json!({"id": "hijack", "name": "n"})))
            .unwrap();
        let clients = h.store.list_clients().unwrap();
        assert_eq!(clients[0].id, out.id);
        assert_eq!(clients[0].attributes["name"], json!("n"));
    }

    #[test]
    fn update_never_demotes_active() {
        let h = harness();
        let out = h.store.create_client(payload(json!({"cif": "U1"}))).unwrap();
        h.store
            .update_client(&out.id, payload(json!({"status": "draft"})))
            .unwrap();
        let c = &h.store.list_clients().unwrap()[0];
        assert_eq!(c.status, ClientStatus::Active);
        assert!(c.draft_updated_at.is_none());
    }

    #[test]
    fn update_of_draft_refreshes_draft_timestamp() {
        let h = harness();
        let out = h.store.upsert_draft(payload(json!({"cif": "D1"}))).unwrap();
        h.clock.advance_millis(1_000);
        h.store
            .update_client(&out.id, payload(json!({"note": "x"})))
            .unwrap();
        let c = &h.store.list_clients().unwrap()[0];
        assert_eq!(c.status, ClientStatus::Draft);
        assert!(c.draft_updated_at.unwrap() > start());
    }

    #[test]
    fn update_missing_is_not_found() {
        let h = harness();
        let err = h
            .store
            .update_client(&id("nope"), ClientPayload::default())
            .unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    #[test]
    fn update_to_foreign_cif_conflicts() {
        let h = harness();
        h.store.create_client(payload(json!({"cif": "C1"}))).unwrap();
        let second = h.store.create_client(payload(json!({"cif": "C2"}))).unwrap();
        let err = h
            .store
            .update_client(&second.id, payload(json!({"cif": "C1"})))
            .unwrap_err();
        assert!(matches!(err, ClientError::Conflict(_)));
    }

    #[test]
    fn update_preserves_insertion_order() {
        let h = harness();
        h.store.create_client(payload(json!({"cif": "C1"}))).unwrap();
        let b = h.store.create_client(payload(json!({"cif": "C2"}))).unwrap();
        h.store.create_client(payload(json!({"cif": "C3"}))).unwrap();
        h.store.update_client(&b.id, payload(json!({"name": "b"}))).unwrap();
        let cifs: Vec<String> = h
            .store
            .list_clients()
            .unwrap()
            .iter()
            .map(|c| c.cif.as_ref().unwrap().to_string())
            .collect();
        assert_eq!(cifs, vec!["C1", "C2", "C3"]);
    }

    // ── Delete ──────────────────────────────────────────────────────

    #[test]
    fn delete_removes_exactly_one_then_not_found() {
        let h = harness();
        h.store.create_client(payload(json!({"cif": "C1"}))).unwrap();
        let b = h.store.create_client(payload(json!({"cif": "C2"}))).unwrap();
        h.store.create_client(payload(json!({"cif": "C3"}))).unwrap();

        let out = h.store.delete_client(&b.id).unwrap();
        assert_eq!(out.count, 2);
        let remaining: Vec<ClientId> =
            h.store.list_clients().unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(remaining, vec![id("client-1"), id("client-3")]);

        let err = h.store.delete_client(&b.id).unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    // ── Self-healing ────────────────────────────────────────────────

    #[test]
    fn load_assigns_missing_ids_and_persists() {
        let h = harness_with(MemoryStorage::with_document(json!([
            {"client": {"cif": "L1", "status": "active", "createdAt": "2025-01-01T00:00:00Z"}},
            {"client": {"id": "kept", "cif": "L2", "status": "draft", "createdAt": "2025-01-02T00:00:00Z"}},
        ])));

        let clients = h.store.list_clients().unwrap();
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].id.as_str(), "client-1");
        assert_eq!(clients[1].id.as_str(), "kept");
        assert_eq!(h.storage.save_count(), 1);

        let doc = h.storage.document().unwrap();
        assert_eq!(doc[0]["client"]["id"], json!("client-1"));

        // The repaired collection is stable on the next read.
        let again = h.store.list_clients().unwrap();
        assert_eq!(again, clients);
        assert_eq!(h.storage.save_count(), 1);
    }

    #[test]
    fn load_persists_defaulted_created_at() {
        let h = harness_with(MemoryStorage::with_document(json!([
            {"client": {"id": "a", "cif": "L1", "status": "active"}},
        ])));

        let first = h.store.list_clients().unwrap();
        assert_eq!(first[0].created_at, start());
        assert_eq!(h.storage.save_count(), 1);
        let doc = h.storage.document().unwrap();
        assert_eq!(doc[0]["client"]["createdAt"], json!("2026-03-10T08:00:00.000Z"));

        h.clock.advance_millis(10_000);
        let second = h.store.list_clients().unwrap();
        assert_eq!(second[0].created_at, first[0].created_at);
        assert_eq!(h.storage.save_count(), 1);
    }

    #[test]
    fn list_of_healthy_document_does_not_write() {
        let h = harness();
        h.store.create_client(payload(json!({"cif": "C1"}))).unwrap();
        let saves = h.storage.save_count();
        h.store.list_clients().unwrap();
        assert_eq!(h.storage.save_count(), saves);
    }

    #[test]
    fn passthrough_attributes_survive_roundtrip() {
        let h = harness();
        let out = h
            .store
            .create_client(payload(json!({
                "cif": "P1",
                "name": "Acme",
                "contact": {"email": "a@b.c"},
            })))
            .unwrap();
        h.store
            .update_client(&out.id, payload(json!({"phone": "600"})))
            .unwrap();
        let c = &h.store.list_clients().unwrap()[0];
        assert_eq!(c.attributes["name"], json!("Acme"));
        assert_eq!(c.attributes["contact"], json!({"email": "a@b.c"}));
        assert_eq!(c.attributes["phone"], json!("600"));
    }

    #[test]
    fn concurrent_creates_are_not_lost() {
        let h = harness();
        let store = Arc::new(h.store);
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .create_client(payload(json!({"cif": format!("T{i}")})))
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.list_clients().unwrap().len(), 8);
    }
}
