//! # Inbound Ports
//!
//! API trait defining what the membership engine can do.

use async_trait::async_trait;
use shared_types::{EventId, EventRecord, ListKind, UserEventKind, UserId};

use crate::config::MembershipConfig;
use crate::domain::{
    CloseOutOutcome, MembershipResult, ReassignmentOutcome, RegistrationOutcome,
    SavedToggleOutcome, UnregistrationOutcome,
};

/// Membership API - inbound port.
///
/// Mutations never return `Err`: their outcome says which sides were
/// written and carries the error, if any. Queries return a plain result.
#[async_trait]
pub trait MembershipApi: Send + Sync {
    /// Register for an event; assigned when a seat is free, backup otherwise.
    async fn register(&self, user_id: &UserId, event_id: &EventId) -> RegistrationOutcome;

    /// Register directly onto the backup list.
    async fn register_backup(&self, user_id: &UserId, event_id: &EventId) -> RegistrationOutcome;

    /// Remove from the assigned (`Active`) or backup list.
    async fn unregister(
        &self,
        user_id: &UserId,
        event_id: &EventId,
        list: ListKind,
    ) -> UnregistrationOutcome;

    /// Move from backup to assigned, capacity permitting.
    async fn promote_from_backup(&self, user_id: &UserId, event_id: &EventId) -> ReassignmentOutcome;

    /// Move from assigned to backup.
    async fn demote_to_backup(&self, user_id: &UserId, event_id: &EventId) -> ReassignmentOutcome;

    /// Flip the event in the user's saved set.
    async fn toggle_saved(&self, user_id: &UserId, event_id: &EventId) -> SavedToggleOutcome;

    /// Mark the event done.
    async fn close_out(&self, event_id: &EventId) -> CloseOutOutcome;

    /// Fetch one event.
    async fn event(&self, event_id: &EventId) -> MembershipResult<EventRecord>;

    /// Fetch every event.
    async fn events(&self) -> MembershipResult<Vec<EventRecord>>;

    /// Fetch the events in one of a user's collections.
    async fn user_events(
        &self,
        user_id: &UserId,
        kind: UserEventKind,
    ) -> MembershipResult<Vec<EventRecord>>;

    /// Active configuration.
    fn config(&self) -> &MembershipConfig;
}
