//! Test harness shared by every scenario.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use shared_types::{EventId, EventRecord, UserId, UserRecord};
use vr_01_record_store::{FaultInjectingStore, InMemoryRecordStore};
use vr_02_membership::test_utils::{seed_event, seed_user, stored_event, stored_user};
use vr_02_membership::{
    invariant_capacity_respected, invariant_membership_mirrored, InvariantViolation,
    MembershipConfig, MembershipService,
};

/// Store stack used by the harness: in-memory store behind a fault injector.
pub type HarnessStore = Arc<FaultInjectingStore<Arc<InMemoryRecordStore>>>;

/// A running roster: one store, one shared service.
pub struct RosterHarness {
    /// Backing store, for seeding and assertions.
    pub inner: Arc<InMemoryRecordStore>,
    /// Fault injector the service talks to.
    pub faults: HarnessStore,
    /// The service under test.
    pub service: Arc<MembershipService<HarnessStore>>,
}

impl RosterHarness {
    /// Harness with the testing configuration and no latency.
    pub fn new() -> Self {
        Self::with(MembershipConfig::for_testing(), None)
    }

    /// Harness with every store call delayed by `latency`.
    pub fn with_latency(latency: Duration) -> Self {
        Self::with(MembershipConfig::for_testing(), Some(latency))
    }

    /// Harness with explicit configuration.
    pub fn with(config: MembershipConfig, latency: Option<Duration>) -> Self {
        vr_telemetry::init_for_tests();

        let inner = Arc::new(InMemoryRecordStore::new());
        let mut faults = FaultInjectingStore::new(Arc::clone(&inner));
        if let Some(latency) = latency {
            faults = faults.with_latency(latency);
        }
        let faults = Arc::new(faults);
        let service = Arc::new(MembershipService::new(Arc::clone(&faults), config));
        Self {
            inner,
            faults,
            service,
        }
    }

    /// Seed events `(id, max)`.
    pub fn events(&self, events: &[(&str, u32)]) -> &Self {
        for (id, max) in events {
            seed_event(&self.inner, id, *max);
        }
        self
    }

    /// Seed users.
    pub fn users<S: AsRef<str>>(&self, users: &[S]) -> &Self {
        for id in users {
            seed_user(&self.inner, id.as_ref());
        }
        self
    }

    /// Stored event.
    pub fn event(&self, id: &str) -> EventRecord {
        stored_event(&self.inner, id)
    }

    /// Stored user.
    pub fn user(&self, id: &str) -> UserRecord {
        stored_user(&self.inner, id)
    }

    /// Every rule broken anywhere in the database.
    pub fn violations(&self) -> Vec<InvariantViolation> {
        let snapshot = self.inner.snapshot();
        let events = decode_all::<EventRecord>(snapshot.get("events"), |record, id| {
            record.id = EventId::from(id)
        });
        let users = decode_all::<UserRecord>(snapshot.get("users"), |record, id| {
            record.id = UserId::from(id)
        });

        let mut violations = Vec::new();
        for event in &events {
            if let Err(v) = invariant_capacity_respected(event) {
                violations.push(v);
            }
            for user in &users {
                if let Err(v) = invariant_membership_mirrored(event, user) {
                    violations.push(v);
                }
            }
        }
        violations
    }

    /// Panic with the list of violations, if any.
    pub fn assert_consistent(&self) {
        let violations = self.violations();
        assert!(violations.is_empty(), "inconsistent roster: {violations:#?}");
    }
}

impl Default for RosterHarness {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_all<T: serde::de::DeserializeOwned>(
    root: Option<&Value>,
    set_id: impl Fn(&mut T, &str),
) -> Vec<T> {
    let Some(Value::Object(entries)) = root else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|(id, value)| {
            let mut record: T = serde_json::from_value(value.clone()).ok()?;
            set_id(&mut record, id);
            Some(record)
        })
        .collect()
}

/// `u0 .. u{n-1}`
pub fn user_ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("u{i}")).collect()
}
