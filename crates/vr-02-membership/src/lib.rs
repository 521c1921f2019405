//! # VR-02 Membership Engine
//!
//! Capacity-bounded event registration with mirrored event/user records.
//!
//! **Subsystem ID:** 02  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Keep two denormalized collections in step over a store that has no
//! multi-key transactions:
//! - `events/{id}/assignedVolunteers` ↔ `users/{id}/registeredEvents`
//! - `events/{id}/backupVolunteers` ↔ `users/{id}/backupEvents`
//!
//! ## Guarantees
//!
//! | Guarantee | Mechanism |
//! |-----------|-----------|
//! | No lost updates | Per-record async locks held from read to last write |
//! | No deadlocks | Locks taken in sorted key order |
//! | Mirrored membership | Event side first, user side second, event side undone on failure |
//! | Atomic-looking moves | Promote/demote as a saga under one lock acquisition |
//!
//! Locks are per process. Several engines sharing one store need the
//! store's own conditional writes.
//!
//! ## Module Structure
//!
//! ```text
//! vr-02-membership/
//! ├── domain/          # Errors, placements, outcomes, saga states, invariants
//! ├── algorithms/      # Placement decision, reassignment saga
//! ├── ports/           # MembershipApi
//! ├── service/         # MembershipService, key locks, dual writes
//! └── config.rs        # MembershipConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-exports
pub use algorithms::{decide_placement, PlacementDecision, ReassignmentSaga};
pub use config::MembershipConfig;
pub use domain::{
    invariant_capacity_respected, invariant_membership_mirrored, BackupReason, CloseOutOutcome,
    ClosedEventPolicy, InvalidTransition, InvariantViolation, MembershipError, MembershipResult,
    Mutation, Placement, ReassignmentKind, ReassignmentOutcome, RecordKind, RegistrationOutcome,
    SagaState, SavedToggleOutcome, TargetList, UnregistrationOutcome,
};
pub use ports::MembershipApi;
pub use service::{KeyGuard, KeyLocks, MembershipService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
