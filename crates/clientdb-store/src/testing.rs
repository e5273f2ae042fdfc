//! Deterministic collaborators for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use clientdb_core::{ClientId, IdentityGenerator};

/// Issues `client-1`, `client-2`, … in order.
#[derive(Debug, Default)]
pub struct SequentialIdentity {
    next: AtomicUsize,
}

impl SequentialIdentity {
    /// How many ids have been issued so far.
    pub fn issued(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }
}

impl IdentityGenerator for SequentialIdentity {
    fn generate(&self) -> ClientId {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        ClientId::parse(format!("client-{n}")).expect("sequential ids are never blank")
    }
}
