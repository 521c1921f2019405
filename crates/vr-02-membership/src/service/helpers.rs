//! Record reads and list writes shared by every operation.

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde_json::Value;
use shared_types::{id_set, paths, EventId, EventRecord, UserId, UserRecord};
use tracing::debug;
use vr_01_record_store::RecordStore;

use super::MembershipService;
use crate::domain::{MembershipError, MembershipResult, Mutation};

impl<S: RecordStore> MembershipService<S> {
    /// Fetch and decode `events/{id}`.
    ///
    /// An id that cannot be a store key cannot name a record, so it is
    /// reported as absent.
    pub(crate) async fn load_event(&self, event_id: &EventId) -> MembershipResult<EventRecord> {
        if paths::validate_key(event_id.as_str()).is_err() {
            return Err(MembershipError::event_not_found(event_id));
        }
        let path = paths::event(event_id);
        let value = self
            .store
            .fetch(&path)
            .await?
            .ok_or_else(|| MembershipError::event_not_found(event_id))?;

        let mut event: EventRecord = decode(&path, value)?;
        if event.id.as_str().is_empty() {
            event.id = event_id.clone();
        }
        debug!(
            "[vr-02] loaded {} ({}/{} assigned, {} backup)",
            path,
            event.assigned_volunteers.len(),
            event.volunteers.max,
            event.backup_volunteers.len()
        );
        Ok(event)
    }

    /// Fetch and decode `users/{id}`.
    pub(crate) async fn load_user(&self, user_id: &UserId) -> MembershipResult<UserRecord> {
        if paths::validate_key(user_id.as_str()).is_err() {
            return Err(MembershipError::user_not_found(user_id));
        }
        let path = paths::user(user_id);
        let value = self
            .store
            .fetch(&path)
            .await?
            .ok_or_else(|| MembershipError::user_not_found(user_id))?;

        let mut user: UserRecord = decode(&path, value)?;
        if user.id.as_str().is_empty() {
            user.id = user_id.clone();
        }
        Ok(user)
    }

    /// Replace the id set at `path`. An empty set deletes the path.
    pub(crate) async fn write_set<T>(&self, path: &str, set: &BTreeSet<T>) -> MembershipResult<()>
    where
        T: AsRef<str> + Ord,
    {
        self.store.store(path, id_set::to_value(set)).await?;
        Ok(())
    }

    /// Refuse `mutation` on a closed event when the policy says so.
    pub(crate) fn check_open(&self, event: &EventRecord, mutation: Mutation) -> MembershipResult<()> {
        if event.is_done && !self.config.closed_event_policy.permits(mutation) {
            return Err(MembershipError::EventClosed {
                event_id: event.id.clone(),
            });
        }
        Ok(())
    }
}

/// Decode a fetched record.
pub(crate) fn decode<T: DeserializeOwned>(path: &str, value: Value) -> MembershipResult<T> {
    serde_json::from_value(value).map_err(|e| MembershipError::Malformed {
        path: path.to_string(),
        reason: e.to_string(),
    })
}
