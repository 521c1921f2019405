//! # Domain Invariants
//!
//! Structural rules over stored records. The engine keeps them under
//! in-process serialization; tests use these checks to assert it.

use shared_types::{EventRecord, ListKind, UserRecord};

use super::errors::InvariantViolation;

/// Invariant: membership is mirrored.
///
/// For both lists, the user appears on the event side iff the event appears
/// in the user's mirror.
pub fn invariant_membership_mirrored(
    event: &EventRecord,
    user: &UserRecord,
) -> Result<(), InvariantViolation> {
    for list in [ListKind::Active, ListKind::Backup] {
        let on_event_side = event.members(list).contains(&user.id);
        let on_user_side = user.mirror(list).contains(&event.id);
        if on_event_side != on_user_side {
            return Err(InvariantViolation::MirrorMismatch {
                user_id: user.id.clone(),
                event_id: event.id.clone(),
                list,
                on_event_side,
                on_user_side,
            });
        }
    }
    Ok(())
}

/// Invariant: the assigned list never exceeds the quota.
///
/// Holds as long as the quota is not lowered below the current roster.
pub fn invariant_capacity_respected(event: &EventRecord) -> Result<(), InvariantViolation> {
    if event.assigned_volunteers.len() > event.capacity() {
        return Err(InvariantViolation::OverCapacity {
            event_id: event.id.clone(),
            assigned: event.assigned_volunteers.len(),
            max: event.volunteers.max,
        });
    }
    Ok(())
}
