//! # Membership Service
//!
//! The main service implementing the Membership API.
//!
//! ## Architecture
//!
//! This service:
//! 1. Implements `MembershipApi` over any `RecordStore`
//! 2. Serializes read-modify-write cycles with per-record locks
//! 3. Writes the event side first, then the user side, and undoes the event
//!    side when the user side fails
//! 4. Runs reassignments as sagas under one lock acquisition

mod close_out;
mod dual_write;
mod helpers;
mod locks;
mod queries;
mod reassignment;
mod registration;
mod saved_events;
mod unregistration;

pub use locks::{KeyGuard, KeyLocks};

use async_trait::async_trait;
use shared_types::{paths, EventId, EventRecord, ListKind, UserEventKind, UserId};
use vr_01_record_store::RecordStore;

use crate::config::MembershipConfig;
use crate::domain::{
    CloseOutOutcome, MembershipResult, ReassignmentOutcome, RegistrationOutcome,
    SavedToggleOutcome, UnregistrationOutcome,
};
use crate::ports::inbound::MembershipApi;

/// The Membership Service.
pub struct MembershipService<S: RecordStore> {
    /// Record store.
    pub(crate) store: S,
    /// Per-record locks.
    pub(crate) locks: KeyLocks,
    /// Service configuration.
    pub(crate) config: MembershipConfig,
}

impl<S: RecordStore> MembershipService<S> {
    /// Create a service over `store`.
    pub fn new(store: S, config: MembershipConfig) -> Self {
        Self {
            store,
            locks: KeyLocks::new(),
            config,
        }
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lock table, exposed for diagnostics.
    pub fn locks(&self) -> &KeyLocks {
        &self.locks
    }

    /// Lock an event and a user record together.
    pub(crate) async fn lock_pair(&self, user_id: &UserId, event_id: &EventId) -> KeyGuard {
        self.locks
            .acquire([paths::event(event_id), paths::user(user_id)])
            .await
    }
}

#[async_trait]
impl<S: RecordStore> MembershipApi for MembershipService<S> {
    async fn register(&self, user_id: &UserId, event_id: &EventId) -> RegistrationOutcome {
        MembershipService::register(self, user_id, event_id).await
    }

    async fn register_backup(&self, user_id: &UserId, event_id: &EventId) -> RegistrationOutcome {
        MembershipService::register_backup(self, user_id, event_id).await
    }

    async fn unregister(
        &self,
        user_id: &UserId,
        event_id: &EventId,
        list: ListKind,
    ) -> UnregistrationOutcome {
        MembershipService::unregister(self, user_id, event_id, list).await
    }

    async fn promote_from_backup(&self, user_id: &UserId, event_id: &EventId) -> ReassignmentOutcome {
        MembershipService::promote_from_backup(self, user_id, event_id).await
    }

    async fn demote_to_backup(&self, user_id: &UserId, event_id: &EventId) -> ReassignmentOutcome {
        MembershipService::demote_to_backup(self, user_id, event_id).await
    }

    async fn toggle_saved(&self, user_id: &UserId, event_id: &EventId) -> SavedToggleOutcome {
        MembershipService::toggle_saved(self, user_id, event_id).await
    }

    async fn close_out(&self, event_id: &EventId) -> CloseOutOutcome {
        MembershipService::close_out(self, event_id).await
    }

    async fn event(&self, event_id: &EventId) -> MembershipResult<EventRecord> {
        MembershipService::event(self, event_id).await
    }

    async fn events(&self) -> MembershipResult<Vec<EventRecord>> {
        MembershipService::events(self).await
    }

    async fn user_events(
        &self,
        user_id: &UserId,
        kind: UserEventKind,
    ) -> MembershipResult<Vec<EventRecord>> {
        MembershipService::user_events(self, user_id, kind).await
    }

    fn config(&self) -> &MembershipConfig {
        &self.config
    }
}
