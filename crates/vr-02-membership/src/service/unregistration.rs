//! Removal from the assigned or backup list.

use shared_types::{EventId, ListKind, UserId};
use tracing::info;
use vr_01_record_store::RecordStore;

use super::dual_write::{MembershipChange, SetOp};
use super::MembershipService;
use crate::domain::{MembershipError, Mutation, UnregistrationOutcome};

impl<S: RecordStore> MembershipService<S> {
    /// Remove from the assigned (`Active`) or backup list.
    pub async fn unregister(
        &self,
        user_id: &UserId,
        event_id: &EventId,
        list: ListKind,
    ) -> UnregistrationOutcome {
        let _guard = self.lock_pair(user_id, event_id).await;
        self.unregister_locked(user_id, event_id, list).await
    }

    /// Removal body. Caller holds the event and user locks.
    pub(crate) async fn unregister_locked(
        &self,
        user_id: &UserId,
        event_id: &EventId,
        list: ListKind,
    ) -> UnregistrationOutcome {
        let rejected = |err| UnregistrationOutcome::rejected(user_id, event_id, list, err);

        let event = match self.load_event(event_id).await {
            Ok(event) => event,
            Err(err) => return rejected(err),
        };
        let user = match self.load_user(user_id).await {
            Ok(user) => user,
            Err(err) => return rejected(err),
        };
        if let Err(err) = self.check_open(&event, Mutation::Unregister) {
            return rejected(err);
        }
        if !event.members(list).contains(user_id) {
            return rejected(MembershipError::MembershipAbsent {
                user_id: user_id.clone(),
                event_id: event_id.clone(),
                list,
            });
        }

        let report = self
            .apply_dual_write(MembershipChange {
                user_id,
                event_id,
                list,
                op: SetOp::Remove,
                event_before: event.members(list),
                user_before: user.mirror(list),
            })
            .await;

        if report.error.is_none() {
            info!(event_id = %event_id, user_id = %user_id, list = %list, "[vr-02] unregistered");
        }

        UnregistrationOutcome {
            user_id: user_id.clone(),
            event_id: event_id.clone(),
            list,
            event_side_removed: report.event_side,
            user_side_removed: report.user_side,
            rolled_back: report.rolled_back,
            error: report.error,
        }
    }
}
