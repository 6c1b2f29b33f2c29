//! crates/membership_core/src/session.rs
//!
//! Explicit session context: a handle to the store's session slot, which
//! mirrors at most one member record. Injected wherever the active identity
//! is needed; there is no ambient global state.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::MemberRecord;
use crate::ports::{PortError, PortResult, RecordStore};

pub struct SessionHolder {
    store: Arc<dyn RecordStore>,
}

impl SessionHolder {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Overwrites the session mirror with the given record.
    pub async fn login(&self, record: &MemberRecord) -> PortResult<()> {
        self.store.write_session(Some(record)).await
    }

    /// Clears the mirror; the system returns to the unauthenticated state.
    pub async fn logout(&self) -> PortResult<()> {
        self.store.write_session(None).await
    }

    pub async fn current(&self) -> PortResult<Option<MemberRecord>> {
        self.store.read_session().await
    }

    /// The active record, provided its id matches the caller's claim.
    /// The claim comes from the auth cookie; a stale or foreign id is
    /// rejected rather than silently switching identities.
    pub async fn active(&self, claimed_id: Uuid) -> PortResult<MemberRecord> {
        match self.store.read_session().await? {
            Some(record) if record.id == claimed_id => Ok(record),
            _ => Err(PortError::Unauthorized),
        }
    }
}
