//! # Value Objects
//!
//! Requests, placements and saga states exchanged by the engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared_types::ListKind;

/// Which list a registration asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetList {
    /// Assigned when a seat is free, backup otherwise.
    #[default]
    Auto,
    /// Backup regardless of free seats.
    Backup,
}

/// Why a registration landed on the backup list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupReason {
    /// The caller asked for backup.
    Requested,
    /// The assigned list was full.
    CapacityFallback,
}

/// Where a registration put the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "list", content = "reason", rename_all = "snake_case")]
pub enum Placement {
    /// Seat on the assigned list.
    Assigned,
    /// Waiting list.
    Backup(BackupReason),
    /// Nothing decided; the operation failed before placement.
    Rejected,
}

impl Placement {
    /// List the placement targets.
    pub fn list(&self) -> Option<ListKind> {
        match self {
            Self::Assigned => Some(ListKind::Active),
            Self::Backup(_) => Some(ListKind::Backup),
            Self::Rejected => None,
        }
    }

    /// True for both backup reasons.
    pub fn is_backup(&self) -> bool {
        matches!(self, Self::Backup(_))
    }
}

/// Direction of a reassignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReassignmentKind {
    /// Backup to assigned, capacity permitting.
    PromoteFromBackup,
    /// Assigned to backup.
    DemoteToBackup,
}

impl ReassignmentKind {
    /// List the user is removed from.
    pub fn source(&self) -> ListKind {
        match self {
            Self::PromoteFromBackup => ListKind::Backup,
            Self::DemoteToBackup => ListKind::Active,
        }
    }

    /// Request used for the re-registration step.
    pub fn target(&self) -> TargetList {
        match self {
            Self::PromoteFromBackup => TargetList::Auto,
            Self::DemoteToBackup => TargetList::Backup,
        }
    }
}

/// Reassignment saga state.
///
/// ```text
/// Pending ──► Removed ──► Completed
///    │           │
///    ▼           ├──► Compensated
/// Aborted        └──► CompensationFailed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SagaState {
    /// Nothing written yet.
    Pending,
    /// Removal step committed.
    Removed,
    /// Both steps committed.
    Completed,
    /// Removal step failed; nothing to undo.
    Aborted,
    /// Second step failed and the removal was undone.
    Compensated,
    /// Second step failed and the undo failed too.
    CompensationFailed,
}

impl SagaState {
    /// Check if the state machine has this edge.
    pub fn can_transition_to(&self, next: SagaState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Removed)
                | (Self::Pending, Self::Aborted)
                | (Self::Removed, Self::Completed)
                | (Self::Removed, Self::Compensated)
                | (Self::Removed, Self::CompensationFailed)
        )
    }

    /// Check if no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Aborted | Self::Compensated | Self::CompensationFailed
        )
    }
}

/// Membership mutations gated by [`ClosedEventPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Insert into a list.
    Register,
    /// Remove from a list.
    Unregister,
}

/// How membership mutations treat an event with `isDone = true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClosedEventPolicy {
    /// No gating.
    Open,
    /// Registrations fail; volunteers may still drop out.
    #[default]
    RejectRegistrations,
    /// Every membership mutation fails.
    Frozen,
}

impl ClosedEventPolicy {
    /// Check if `mutation` may run against a closed event.
    pub fn permits(&self, mutation: Mutation) -> bool {
        match self {
            Self::Open => true,
            Self::RejectRegistrations => mutation == Mutation::Unregister,
            Self::Frozen => false,
        }
    }
}

impl fmt::Display for ClosedEventPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::RejectRegistrations => f.write_str("reject-registrations"),
            Self::Frozen => f.write_str("frozen"),
        }
    }
}

impl FromStr for ClosedEventPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "reject-registrations" | "reject_registrations" => Ok(Self::RejectRegistrations),
            "frozen" => Ok(Self::Frozen),
            other => Err(format!("unknown closed-event policy: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_list() {
        assert_eq!(Placement::Assigned.list(), Some(ListKind::Active));
        assert_eq!(
            Placement::Backup(BackupReason::CapacityFallback).list(),
            Some(ListKind::Backup)
        );
        assert_eq!(Placement::Rejected.list(), None);
        assert!(Placement::Backup(BackupReason::Requested).is_backup());
        assert!(!Placement::Assigned.is_backup());
    }

    #[test]
    fn test_reassignment_directions() {
        assert_eq!(ReassignmentKind::PromoteFromBackup.source(), ListKind::Backup);
        assert_eq!(ReassignmentKind::PromoteFromBackup.target(), TargetList::Auto);
        assert_eq!(ReassignmentKind::DemoteToBackup.source(), ListKind::Active);
        assert_eq!(ReassignmentKind::DemoteToBackup.target(), TargetList::Backup);
    }

    #[test]
    fn test_saga_transitions() {
        assert!(SagaState::Pending.can_transition_to(SagaState::Removed));
        assert!(SagaState::Pending.can_transition_to(SagaState::Aborted));
        assert!(SagaState::Removed.can_transition_to(SagaState::Compensated));
        assert!(!SagaState::Pending.can_transition_to(SagaState::Completed));
        assert!(!SagaState::Completed.can_transition_to(SagaState::Removed));
        assert!(!SagaState::Aborted.can_transition_to(SagaState::Removed));
    }

    #[test]
    fn test_saga_terminal_states() {
        assert!(!SagaState::Pending.is_terminal());
        assert!(!SagaState::Removed.is_terminal());
        assert!(SagaState::Completed.is_terminal());
        assert!(SagaState::CompensationFailed.is_terminal());
    }

    #[test]
    fn test_closed_event_policy() {
        assert!(ClosedEventPolicy::Open.permits(Mutation::Register));
        assert!(!ClosedEventPolicy::RejectRegistrations.permits(Mutation::Register));
        assert!(ClosedEventPolicy::RejectRegistrations.permits(Mutation::Unregister));
        assert!(!ClosedEventPolicy::Frozen.permits(Mutation::Unregister));
    }

    #[test]
    fn test_closed_event_policy_parse() {
        assert_eq!("frozen".parse(), Ok(ClosedEventPolicy::Frozen));
        assert_eq!(
            "Reject-Registrations".parse(),
            Ok(ClosedEventPolicy::RejectRegistrations)
        );
        assert!("sometimes".parse::<ClosedEventPolicy>().is_err());
        assert_eq!(ClosedEventPolicy::default().to_string(), "reject-registrations");
    }

    #[test]
    fn test_placement_serialization() {
        let value = serde_json::to_value(Placement::Backup(BackupReason::CapacityFallback)).unwrap();
        assert_eq!(value, serde_json::json!({ "list": "backup", "reason": "capacity_fallback" }));
        let value = serde_json::to_value(Placement::Assigned).unwrap();
        assert_eq!(value, serde_json::json!({ "list": "assigned" }));
    }
}
