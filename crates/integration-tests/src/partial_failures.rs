//! # Partial Failures
//!
//! Store failures between the two writes of a membership change, and inside
//! reassignment sagas.

#[cfg(test)]
mod tests {
    use shared_types::{EventId, ListKind, UserId};
    use vr_01_record_store::FaultOp;
    use vr_02_membership::test_utils::ids;
    use vr_02_membership::{MembershipConfig, MembershipError, SagaState};

    use crate::harness::RosterHarness;

    fn e(id: &str) -> EventId {
        EventId::from(id)
    }

    fn u(id: &str) -> UserId {
        UserId::from(id)
    }

    #[tokio::test]
    async fn test_user_side_failure_leaves_both_sides_unchanged() {
        let h = RosterHarness::new();
        h.events(&[("e1", 2)]).users(&["u1", "u2"]);
        h.service.register(&u("u2"), &e("e1")).await;
        let before = h.inner.snapshot();
        h.faults.fail_writes_under("users/u1", Some(1)).unwrap();

        let outcome = h.service.register(&u("u1"), &e("e1")).await;

        assert!(outcome.rolled_back);
        assert_eq!(outcome.error.as_ref().map(|e| e.code()), Some("UNKNOWN_ERROR"));
        assert_eq!(h.inner.snapshot(), before);
        h.assert_consistent();

        // The fault was one-shot; a retry by the caller succeeds.
        assert!(h.service.register(&u("u1"), &e("e1")).await.is_success());
        h.assert_consistent();
    }

    #[tokio::test]
    async fn test_disabled_compensation_exposes_half_write() {
        let config = MembershipConfig {
            compensate_partial_writes: false,
            ..MembershipConfig::for_testing()
        };
        let h = RosterHarness::with(config, None);
        h.events(&[("e1", 2)]).users(&["u1"]);
        h.faults.fail_writes_under("users/u1", None).unwrap();

        let outcome = h.service.register(&u("u1"), &e("e1")).await;

        assert!(outcome.event_side_written);
        assert!(!outcome.user_side_written);
        assert_eq!(h.violations().len(), 1);
    }

    #[tokio::test]
    async fn test_event_side_failure_writes_nothing() {
        let h = RosterHarness::new();
        h.events(&[("e1", 2)]).users(&["u1"]);
        h.faults.fail_writes_under("events/e1", Some(1)).unwrap();

        let outcome = h.service.register(&u("u1"), &e("e1")).await;

        assert!(!outcome.event_side_written);
        assert!(!outcome.user_side_written);
        assert!(!outcome.rolled_back);
        assert_eq!(h.inner.writes(), 0);
    }

    #[tokio::test]
    async fn test_read_failure_surfaces_as_persistence_failure() {
        let h = RosterHarness::new();
        h.events(&[("e1", 2)]).users(&["u1"]);
        h.faults.fail_reads_under("users/u1", Some(1)).unwrap();

        let outcome = h.service.register(&u("u1"), &e("e1")).await;

        assert!(matches!(outcome.error, Some(MembershipError::PersistenceFailure { .. })));
        assert_eq!(h.inner.writes(), 0);
    }

    #[tokio::test]
    async fn test_promote_second_step_failure_restores_backup() {
        let h = RosterHarness::new();
        h.events(&[("e1", 2)]).users(&["u1"]);
        h.service.register_backup(&u("u1"), &e("e1")).await;
        let before = h.inner.snapshot();
        h.faults
            .fail_writes_under("users/u1/registeredEvents", Some(1))
            .unwrap();

        let outcome = h.service.promote_from_backup(&u("u1"), &e("e1")).await;

        assert_eq!(outcome.state, SagaState::Compensated);
        let registration = outcome.registration.as_ref().unwrap();
        assert!(registration.rolled_back);
        assert_eq!(h.inner.snapshot(), before);
        assert_eq!(ids(&h.event("e1").backup_volunteers), ["u1"]);
        h.assert_consistent();
    }

    #[tokio::test]
    async fn test_compensation_failure_is_reported_not_hidden() {
        let h = RosterHarness::new();
        h.events(&[("e1", 2)]).users(&["u1"]);
        h.service.register_backup(&u("u1"), &e("e1")).await;
        h.faults
            .fail(FaultOp::Store, "events/e1/assignedVolunteers", None)
            .unwrap();
        h.faults
            .fail_after(FaultOp::Store, "events/e1/backupVolunteers", 1, None)
            .unwrap();

        let outcome = h.service.promote_from_backup(&u("u1"), &e("e1")).await;

        assert_eq!(outcome.state, SagaState::CompensationFailed);
        assert!(outcome.error.is_some());
        assert!(h.event("e1").backup_volunteers.is_empty());
        // The removal step itself completed on both sides.
        h.assert_consistent();
    }

    #[tokio::test]
    async fn test_unregister_failure_then_retry() {
        let h = RosterHarness::new();
        h.events(&[("e1", 1)]).users(&["u1"]);
        h.service.register(&u("u1"), &e("e1")).await;
        h.faults.fail_writes_under("events/e1", Some(1)).unwrap();

        let first = h.service.unregister(&u("u1"), &e("e1"), ListKind::Active).await;
        assert!(!first.event_side_removed);
        assert!(first.error.is_some());

        let second = h.service.unregister(&u("u1"), &e("e1"), ListKind::Active).await;
        assert!(second.is_success());
        h.assert_consistent();
    }
}
