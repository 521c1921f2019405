//! Mirrored list writes.
//!
//! A membership change touches two records: the event-side list and the
//! user-side mirror. The event side is written first; the user side only
//! after that succeeds. When the user side fails, the event side is put back
//! to its previous contents (unless compensation is disabled).

use std::collections::BTreeSet;

use shared_types::{paths, EventId, ListKind, UserId};
use tracing::{debug, error, warn};
use vr_01_record_store::RecordStore;

use super::MembershipService;
use crate::domain::MembershipError;

/// Direction of a membership change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SetOp {
    Insert,
    Remove,
}

/// One membership change with both lists as read under the lock.
pub(crate) struct MembershipChange<'a> {
    pub user_id: &'a UserId,
    pub event_id: &'a EventId,
    pub list: ListKind,
    pub op: SetOp,
    pub event_before: &'a BTreeSet<UserId>,
    pub user_before: &'a BTreeSet<EventId>,
}

/// What reached the store.
#[derive(Debug, Default)]
pub(crate) struct DualWriteReport {
    /// Event side holds the change.
    pub event_side: bool,
    /// User side holds the change.
    pub user_side: bool,
    /// Event side was restored after a user-side failure.
    pub rolled_back: bool,
    pub error: Option<MembershipError>,
}

impl<S: RecordStore> MembershipService<S> {
    /// Write both sides of `change`.
    pub(crate) async fn apply_dual_write(&self, change: MembershipChange<'_>) -> DualWriteReport {
        let mut report = DualWriteReport::default();
        let event_path = paths::event_list(change.event_id, change.list);
        let user_path = paths::user_list(change.user_id, change.list);

        let event_after = apply(change.event_before, change.user_id, change.op);
        if let Err(err) = self.write_set(&event_path, &event_after).await {
            warn!(
                event_id = %change.event_id,
                user_id = %change.user_id,
                list = %change.list,
                "[vr-02] event-side write failed: {}",
                err
            );
            report.error = Some(err);
            return report;
        }
        report.event_side = true;

        let user_after = apply(change.user_before, change.event_id, change.op);
        if user_after == *change.user_before {
            debug!("[vr-02] {} already mirrors {}", user_path, change.event_id);
            report.user_side = true;
            return report;
        }

        match self.write_set(&user_path, &user_after).await {
            Ok(()) => report.user_side = true,
            Err(err) => {
                warn!(
                    event_id = %change.event_id,
                    user_id = %change.user_id,
                    list = %change.list,
                    "[vr-02] user-side write failed: {}",
                    err
                );
                report.error = Some(err);
                if self.config.compensate_partial_writes {
                    self.restore_event_side(&event_path, change.event_before, &mut report)
                        .await;
                }
            }
        }
        report
    }

    async fn restore_event_side(
        &self,
        event_path: &str,
        before: &BTreeSet<UserId>,
        report: &mut DualWriteReport,
    ) {
        match self.write_set(event_path, before).await {
            Ok(()) => {
                warn!("[vr-02] restored {} after partial write", event_path);
                report.event_side = false;
                report.rolled_back = true;
            }
            Err(err) => {
                error!(
                    "[vr-02] could not restore {}, records left half-written: {}",
                    event_path, err
                );
            }
        }
    }
}

fn apply<T: Ord + Clone>(before: &BTreeSet<T>, id: &T, op: SetOp) -> BTreeSet<T> {
    let mut after = before.clone();
    match op {
        SetOp::Insert => {
            after.insert(id.clone());
        }
        SetOp::Remove => {
            after.remove(id);
        }
    }
    after
}
