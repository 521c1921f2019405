//! # Operation Outcomes
//!
//! Every mutating operation reports which sides it wrote together with at
//! most one error, so a caller can tell a clean failure from a half-written
//! one.

use serde::Serialize;
use shared_types::{EventId, ListKind, UserId};
use uuid::Uuid;

use super::errors::{MembershipError, MembershipResult};
use super::value_objects::{Placement, ReassignmentKind, SagaState};

/// Result of `register` / `register_backup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationOutcome {
    /// User
    pub user_id: UserId,
    /// Event
    pub event_id: EventId,
    /// Event-side list holds the user.
    pub event_side_written: bool,
    /// User-side mirror holds the event.
    pub user_side_written: bool,
    /// Decided placement.
    pub placement: Placement,
    /// The event-side write was undone after a user-side failure.
    pub rolled_back: bool,
    /// Failure that stopped the registration.
    pub error: Option<MembershipError>,
}

impl RegistrationOutcome {
    /// Outcome of a registration refused before any write.
    pub fn rejected(user_id: &UserId, event_id: &EventId, error: MembershipError) -> Self {
        Self {
            user_id: user_id.clone(),
            event_id: event_id.clone(),
            event_side_written: false,
            user_side_written: false,
            placement: Placement::Rejected,
            rolled_back: false,
            error: Some(error),
        }
    }

    /// Placement was the backup list.
    pub fn was_backup(&self) -> bool {
        self.placement.is_backup()
    }

    /// Both sides written and no error.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.event_side_written && self.user_side_written
    }

    /// Placement on success, the error otherwise.
    pub fn into_result(self) -> MembershipResult<Placement> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.placement),
        }
    }
}

/// Result of `unregister`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnregistrationOutcome {
    /// User
    pub user_id: UserId,
    /// Event
    pub event_id: EventId,
    /// List the removal targeted.
    pub list: ListKind,
    /// Event-side list no longer holds the user.
    pub event_side_removed: bool,
    /// User-side mirror no longer holds the event.
    pub user_side_removed: bool,
    /// The event-side removal was undone after a user-side failure.
    pub rolled_back: bool,
    /// Failure, if any.
    pub error: Option<MembershipError>,
}

impl UnregistrationOutcome {
    /// Outcome of a removal refused before any write.
    pub fn rejected(
        user_id: &UserId,
        event_id: &EventId,
        list: ListKind,
        error: MembershipError,
    ) -> Self {
        Self {
            user_id: user_id.clone(),
            event_id: event_id.clone(),
            list,
            event_side_removed: false,
            user_side_removed: false,
            rolled_back: false,
            error: Some(error),
        }
    }

    /// Both sides removed and no error.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.event_side_removed && self.user_side_removed
    }
}

/// Result of `promote_from_backup` / `demote_to_backup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReassignmentOutcome {
    /// Correlation id, also present in logs.
    pub saga_id: Uuid,
    /// Direction
    pub kind: ReassignmentKind,
    /// Final saga state.
    pub state: SagaState,
    /// Removal step.
    pub removal: Option<UnregistrationOutcome>,
    /// Re-registration step, when it ran.
    pub registration: Option<RegistrationOutcome>,
    /// Failure of whichever step failed.
    pub error: Option<MembershipError>,
}

impl ReassignmentOutcome {
    /// Saga completed both steps.
    pub fn is_success(&self) -> bool {
        self.state == SagaState::Completed
    }

    /// Final placement, when the saga completed.
    pub fn placement(&self) -> Option<Placement> {
        if !self.is_success() {
            return None;
        }
        self.registration.as_ref().map(|r| r.placement)
    }
}

/// Result of `toggle_saved`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedToggleOutcome {
    /// User
    pub user_id: UserId,
    /// Event
    pub event_id: EventId,
    /// Persisted state after the call.
    pub is_saved: bool,
    /// Failure, if any.
    pub error: Option<MembershipError>,
}

/// Result of `close_out`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloseOutOutcome {
    /// Event
    pub event_id: EventId,
    /// `isDone` was written.
    pub is_done: bool,
    /// Failure, if any.
    pub error: Option<MembershipError>,
}
