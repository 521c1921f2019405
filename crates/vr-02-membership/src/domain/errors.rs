//! # Domain Errors
//!
//! Failures of membership operations, and their catalog codes.

use serde::Serialize;
use shared_types::{EventId, ListKind, UserId};
use thiserror::Error;
use vr_01_record_store::StoreError;

use super::value_objects::SagaState;

/// Kind of record a lookup targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// `events/{id}`
    Event,
    /// `users/{id}`
    User,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Event => f.write_str("Event"),
            Self::User => f.write_str("User"),
        }
    }
}

/// Membership error types.
///
/// At most one of these travels in an outcome. `CapacityPolicy` is the only
/// non-fatal variant: it explains a fallback onto the backup list and is
/// dropped once both sides of that fallback are written.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MembershipError {
    /// Event or user record absent.
    #[error("{record} not found: {id}")]
    NotFound {
        /// Which record
        record: RecordKind,
        /// Requested id
        id: String,
    },

    /// User already holds a seat at the event.
    #[error("User {user_id} already registered to event {event_id}")]
    AlreadyRegistered {
        /// User
        user_id: UserId,
        /// Event
        event_id: EventId,
    },

    /// Assigned list full; the user was placed on backup instead.
    #[error("Event {event_id} is full ({max} volunteers), placed on backup")]
    CapacityPolicy {
        /// Event
        event_id: EventId,
        /// Capacity of the assigned list
        max: u32,
    },

    /// User is not on the list a removal targeted.
    #[error("User {user_id} is not on the {list} list of event {event_id}")]
    MembershipAbsent {
        /// User
        user_id: UserId,
        /// Event
        event_id: EventId,
        /// Targeted list
        list: ListKind,
    },

    /// A store call failed.
    #[error("Persistence failure at {path}: {reason}")]
    PersistenceFailure {
        /// Path of the failed call
        path: String,
        /// Reason reported by the store
        reason: String,
    },

    /// Event is closed to this mutation.
    #[error("Event {event_id} is closed")]
    EventClosed {
        /// Event
        event_id: EventId,
    },

    /// A stored record could not be decoded.
    #[error("Malformed record at {path}: {reason}")]
    Malformed {
        /// Record path
        path: String,
        /// Decoder message
        reason: String,
    },
}

impl MembershipError {
    /// Event record absent.
    pub fn event_not_found(id: &EventId) -> Self {
        Self::NotFound {
            record: RecordKind::Event,
            id: id.to_string(),
        }
    }

    /// User record absent.
    pub fn user_not_found(id: &UserId) -> Self {
        Self::NotFound {
            record: RecordKind::User,
            id: id.to_string(),
        }
    }

    /// Catalog code string for outer layers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "INVALID_PARAMS",
            Self::AlreadyRegistered { .. } => "ALREADY_REGISTERED",
            Self::CapacityPolicy { .. } => "EVENT_FULL",
            Self::EventClosed { .. } => "EVENT_CLOSED",
            Self::MembershipAbsent { .. }
            | Self::PersistenceFailure { .. }
            | Self::Malformed { .. } => "UNKNOWN_ERROR",
        }
    }
}

impl From<StoreError> for MembershipError {
    fn from(err: StoreError) -> Self {
        Self::PersistenceFailure {
            path: err.path().unwrap_or_default().to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type for membership operations.
pub type MembershipResult<T> = Result<T, MembershipError>;

/// Saga asked to move along an edge its state machine does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid saga transition: {from:?} -> {to:?}")]
pub struct InvalidTransition {
    /// Current state
    pub from: SagaState,
    /// Requested state
    pub to: SagaState,
}

/// Stored membership breaks a structural rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// One side of a mirrored pair lists the other, the reverse side does not.
    #[error("{list} membership of {user_id} in {event_id} not mirrored (event side: {on_event_side}, user side: {on_user_side})")]
    MirrorMismatch {
        /// User
        user_id: UserId,
        /// Event
        event_id: EventId,
        /// List
        list: ListKind,
        /// Present in the event-side list
        on_event_side: bool,
        /// Present in the user-side list
        on_user_side: bool,
    },

    /// Assigned list larger than the quota.
    #[error("Event {event_id} holds {assigned} assigned volunteers, max is {max}")]
    OverCapacity {
        /// Event
        event_id: EventId,
        /// Assigned count
        assigned: usize,
        /// Quota
        max: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let event_id = EventId::from("e1");
        let user_id = UserId::from("u1");

        assert_eq!(MembershipError::event_not_found(&event_id).code(), "INVALID_PARAMS");
        assert_eq!(
            MembershipError::AlreadyRegistered {
                user_id: user_id.clone(),
                event_id: event_id.clone()
            }
            .code(),
            "ALREADY_REGISTERED"
        );
        assert_eq!(
            MembershipError::CapacityPolicy {
                event_id: event_id.clone(),
                max: 2
            }
            .code(),
            "EVENT_FULL"
        );
        assert_eq!(
            MembershipError::MembershipAbsent {
                user_id,
                event_id: event_id.clone(),
                list: ListKind::Backup
            }
            .code(),
            "UNKNOWN_ERROR"
        );
        assert_eq!(MembershipError::EventClosed { event_id }.code(), "EVENT_CLOSED");
    }

    #[test]
    fn test_store_error_conversion() {
        let err: MembershipError = StoreError::WriteRejected {
            path: "events/e1/assignedVolunteers".to_string(),
            reason: "denied".to_string(),
        }
        .into();

        match err {
            MembershipError::PersistenceFailure { path, reason } => {
                assert_eq!(path, "events/e1/assignedVolunteers");
                assert!(reason.contains("denied"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = MembershipError::user_not_found(&UserId::from("u9"));
        assert_eq!(err.to_string(), "User not found: u9");
    }

    #[test]
    fn test_error_serializes_tagged() {
        let err = MembershipError::EventClosed {
            event_id: EventId::from("e1"),
        };
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["kind"], "event_closed");
        assert_eq!(value["event_id"], "e1");
    }
}
