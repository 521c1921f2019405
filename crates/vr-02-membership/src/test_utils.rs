//! Test fixtures for the membership engine.
//!
//! Compiled for this crate's tests and, behind the `test-utils` feature,
//! for downstream test crates.

use std::sync::Arc;

use serde_json::json;
use shared_types::{paths, EventId, EventRecord, UserId, UserRecord};
use vr_01_record_store::InMemoryRecordStore;

use crate::config::MembershipConfig;
use crate::service::MembershipService;

/// Service over a shared in-memory store.
pub type InMemoryService = MembershipService<Arc<InMemoryRecordStore>>;

/// Fresh store plus a service over it with the testing configuration.
pub fn make_test_service() -> (Arc<InMemoryRecordStore>, InMemoryService) {
    make_test_service_with(MembershipConfig::for_testing())
}

/// Fresh store plus a service over it.
pub fn make_test_service_with(config: MembershipConfig) -> (Arc<InMemoryRecordStore>, InMemoryService) {
    let store = Arc::new(InMemoryRecordStore::new());
    let service = MembershipService::new(Arc::clone(&store), config);
    (store, service)
}

/// Seed an open event with an empty roster.
pub fn seed_event(store: &InMemoryRecordStore, id: &str, max: u32) {
    store
        .seed(
            &paths::event(&EventId::from(id)),
            json!({ "id": id, "title": format!("Event {id}"), "volunteers": { "max": max } }),
        )
        .expect("seed event");
}

/// Seed a user with no memberships.
pub fn seed_user(store: &InMemoryRecordStore, id: &str) {
    store
        .seed(
            &paths::user(&UserId::from(id)),
            json!({ "id": id, "name": format!("User {id}") }),
        )
        .expect("seed user");
}

/// Decode the stored event, failing the test when absent.
pub fn stored_event(store: &InMemoryRecordStore, id: &str) -> EventRecord {
    let value = store
        .value_at(&paths::event(&EventId::from(id)))
        .expect("event present");
    serde_json::from_value(value).expect("event decodes")
}

/// Decode the stored user, failing the test when absent.
pub fn stored_user(store: &InMemoryRecordStore, id: &str) -> UserRecord {
    let value = store
        .value_at(&paths::user(&UserId::from(id)))
        .expect("user present");
    let mut user: UserRecord = serde_json::from_value(value).expect("user decodes");
    if user.id.as_str().is_empty() {
        user.id = UserId::from(id);
    }
    user
}

/// Ids as sorted strings, for assertions.
pub fn ids<T: AsRef<str>>(set: &std::collections::BTreeSet<T>) -> Vec<String> {
    set.iter().map(|id| id.as_ref().to_string()).collect()
}
