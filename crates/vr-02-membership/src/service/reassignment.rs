//! Promote/demote sagas.
//!
//! Both steps run under one acquisition of the event and user locks, so no
//! other operation observes the intermediate state in which the user is on
//! neither list.

use shared_types::{EventId, ListKind, UserId};
use tracing::{error, info, warn};
use uuid::Uuid;
use vr_01_record_store::RecordStore;

use super::dual_write::{MembershipChange, SetOp};
use super::MembershipService;
use crate::algorithms::ReassignmentSaga;
use crate::domain::{
    InvalidTransition, MembershipError, MembershipResult, Mutation, ReassignmentKind,
    ReassignmentOutcome, RegistrationOutcome, UnregistrationOutcome,
};

impl<S: RecordStore> MembershipService<S> {
    /// Move from backup to assigned. At capacity the user lands on backup
    /// again and the roster is unchanged.
    pub async fn promote_from_backup(&self, user_id: &UserId, event_id: &EventId) -> ReassignmentOutcome {
        self.reassign(user_id, event_id, ReassignmentKind::PromoteFromBackup)
            .await
    }

    /// Move from assigned to backup.
    pub async fn demote_to_backup(&self, user_id: &UserId, event_id: &EventId) -> ReassignmentOutcome {
        self.reassign(user_id, event_id, ReassignmentKind::DemoteToBackup)
            .await
    }

    async fn reassign(
        &self,
        user_id: &UserId,
        event_id: &EventId,
        kind: ReassignmentKind,
    ) -> ReassignmentOutcome {
        let _guard = self.lock_pair(user_id, event_id).await;
        let mut saga = ReassignmentSaga::new(kind);
        let saga_id = saga.id();

        // Refuse up front rather than remove and then compensate.
        if let Err(err) = self.precheck_reassignment(event_id).await {
            record_transition(saga_id, saga.abort());
            return finish(&saga, None, None, Some(err));
        }

        let removal = self.unregister_locked(user_id, event_id, kind.source()).await;
        if let Some(err) = removal.error.clone() {
            warn!(%saga_id, event_id = %event_id, user_id = %user_id, "[vr-02] saga aborted: {}", err);
            // A half-applied removal is not undone here; its outcome
            // already reports which side changed.
            record_transition(saga_id, saga.abort());
            return finish(&saga, Some(removal), None, Some(err));
        }
        record_transition(saga_id, saga.removed());

        let registration = self.register_locked(user_id, event_id, kind.target()).await;
        let Some(step_error) = registration.error.clone() else {
            record_transition(saga_id, saga.complete());
            info!(
                %saga_id,
                event_id = %event_id,
                user_id = %user_id,
                "[vr-02] {:?} completed ({:?})",
                kind,
                registration.placement
            );
            return finish(&saga, Some(removal), Some(registration), None);
        };

        warn!(
            %saga_id,
            event_id = %event_id,
            user_id = %user_id,
            "[vr-02] re-registration failed, restoring {} membership: {}",
            kind.source(),
            step_error
        );
        let restored = match self.restore_membership(user_id, event_id, kind.source()).await {
            Ok(()) => true,
            Err(err) => {
                error!(
                    %saga_id,
                    event_id = %event_id,
                    user_id = %user_id,
                    "[vr-02] compensation failed: {}",
                    err
                );
                false
            }
        };
        record_transition(saga_id, saga.compensate(restored));
        finish(&saga, Some(removal), Some(registration), Some(step_error))
    }

    async fn precheck_reassignment(&self, event_id: &EventId) -> MembershipResult<()> {
        let event = self.load_event(event_id).await?;
        self.check_open(&event, Mutation::Unregister)?;
        self.check_open(&event, Mutation::Register)
    }

    /// Put the user back on `list`, both sides, with no capacity check.
    async fn restore_membership(
        &self,
        user_id: &UserId,
        event_id: &EventId,
        list: ListKind,
    ) -> MembershipResult<()> {
        let event = self.load_event(event_id).await?;
        let user = self.load_user(user_id).await?;

        let report = self
            .apply_dual_write(MembershipChange {
                user_id,
                event_id,
                list,
                op: SetOp::Insert,
                event_before: event.members(list),
                user_before: user.mirror(list),
            })
            .await;

        match report.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn record_transition(saga_id: Uuid, result: Result<(), InvalidTransition>) {
    if let Err(err) = result {
        error!(%saga_id, "[vr-02] {}", err);
    }
}

fn finish(
    saga: &ReassignmentSaga,
    removal: Option<UnregistrationOutcome>,
    registration: Option<RegistrationOutcome>,
    error: Option<MembershipError>,
) -> ReassignmentOutcome {
    ReassignmentOutcome {
        saga_id: saga.id(),
        kind: saga.kind(),
        state: saga.state(),
        removal,
        registration,
        error,
    }
}
