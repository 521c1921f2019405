//! # Placement Decision
//!
//! Pure choice of the list a registration lands on. Rules, in order:
//!
//! 1. already on the assigned list → `AlreadyRegistered`
//! 2. backup requested → backup
//! 3. assigned list full → backup, with the capacity signal
//! 4. otherwise → assigned
//!
//! Only the assigned list is inspected by rule 1; a user already waiting may
//! register again.

use shared_types::{EventRecord, ListKind, UserId};

use crate::domain::{BackupReason, MembershipError, Placement, TargetList};

/// Outcome of [`decide_placement`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementDecision {
    /// List to insert into.
    pub list: ListKind,
    /// Placement to report.
    pub placement: Placement,
    /// Capacity fallback notice. Logged, never reported once both writes land.
    pub signal: Option<MembershipError>,
}

/// Decide where `user_id` goes on `event`.
pub fn decide_placement(
    event: &EventRecord,
    user_id: &UserId,
    target: TargetList,
) -> Result<PlacementDecision, MembershipError> {
    if event.assigned_volunteers.contains(user_id) {
        return Err(MembershipError::AlreadyRegistered {
            user_id: user_id.clone(),
            event_id: event.id.clone(),
        });
    }

    if target == TargetList::Backup {
        return Ok(PlacementDecision {
            list: ListKind::Backup,
            placement: Placement::Backup(BackupReason::Requested),
            signal: None,
        });
    }

    if event.is_full() {
        return Ok(PlacementDecision {
            list: ListKind::Backup,
            placement: Placement::Backup(BackupReason::CapacityFallback),
            signal: Some(MembershipError::CapacityPolicy {
                event_id: event.id.clone(),
                max: event.volunteers.max,
            }),
        });
    }

    Ok(PlacementDecision {
        list: ListKind::Active,
        placement: Placement::Assigned,
        signal: None,
    })
}
