//! Registration onto the assigned or backup list.

use shared_types::{EventId, UserId};
use tracing::{debug, info};
use vr_01_record_store::RecordStore;

use super::dual_write::{MembershipChange, SetOp};
use super::MembershipService;
use crate::algorithms::decide_placement;
use crate::domain::{Mutation, RegistrationOutcome, TargetList};

impl<S: RecordStore> MembershipService<S> {
    /// Register for an event; assigned when a seat is free, backup otherwise.
    pub async fn register(&self, user_id: &UserId, event_id: &EventId) -> RegistrationOutcome {
        self.register_to(user_id, event_id, TargetList::Auto).await
    }

    /// Register directly onto the backup list.
    pub async fn register_backup(&self, user_id: &UserId, event_id: &EventId) -> RegistrationOutcome {
        self.register_to(user_id, event_id, TargetList::Backup).await
    }

    /// Register with an explicit target-list request.
    pub async fn register_to(
        &self,
        user_id: &UserId,
        event_id: &EventId,
        target: TargetList,
    ) -> RegistrationOutcome {
        let _guard = self.lock_pair(user_id, event_id).await;
        self.register_locked(user_id, event_id, target).await
    }

    /// Registration body. Caller holds the event and user locks.
    pub(crate) async fn register_locked(
        &self,
        user_id: &UserId,
        event_id: &EventId,
        target: TargetList,
    ) -> RegistrationOutcome {
        let event = match self.load_event(event_id).await {
            Ok(event) => event,
            Err(err) => return RegistrationOutcome::rejected(user_id, event_id, err),
        };
        let user = match self.load_user(user_id).await {
            Ok(user) => user,
            Err(err) => return RegistrationOutcome::rejected(user_id, event_id, err),
        };
        if let Err(err) = self.check_open(&event, Mutation::Register) {
            return RegistrationOutcome::rejected(user_id, event_id, err);
        }

        let decision = match decide_placement(&event, user_id, target) {
            Ok(decision) => decision,
            Err(err) => {
                debug!(event_id = %event_id, user_id = %user_id, "[vr-02] registration refused: {}", err);
                return RegistrationOutcome::rejected(user_id, event_id, err);
            }
        };
        if let Some(signal) = &decision.signal {
            debug!(event_id = %event_id, user_id = %user_id, "[vr-02] {}", signal);
        }

        let report = self
            .apply_dual_write(MembershipChange {
                user_id,
                event_id,
                list: decision.list,
                op: SetOp::Insert,
                event_before: event.members(decision.list),
                user_before: user.mirror(decision.list),
            })
            .await;

        if report.error.is_none() {
            info!(
                event_id = %event_id,
                user_id = %user_id,
                list = %decision.list,
                "[vr-02] registered ({:?})",
                decision.placement
            );
        }

        RegistrationOutcome {
            user_id: user_id.clone(),
            event_id: event_id.clone(),
            event_side_written: report.event_side,
            user_side_written: report.user_side,
            placement: decision.placement,
            rolled_back: report.rolled_back,
            error: report.error,
        }
    }
}
