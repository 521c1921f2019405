//! Read-only queries.

use futures::stream::{self, StreamExt};
use serde_json::Value;
use shared_types::{paths, EventId, EventRecord, UserEventKind, UserId};
use tracing::warn;
use vr_01_record_store::RecordStore;

use super::helpers::decode;
use super::MembershipService;
use crate::domain::{MembershipError, MembershipResult};

impl<S: RecordStore> MembershipService<S> {
    /// Fetch one event.
    pub async fn event(&self, event_id: &EventId) -> MembershipResult<EventRecord> {
        self.load_event(event_id).await
    }

    /// Fetch every event, ordered by id. Records that fail to decode are
    /// skipped with a warning.
    ///
    /// An array root is the store's rendering of numeric event ids; each
    /// element's index is its id and `null` holes are skipped.
    pub async fn events(&self) -> MembershipResult<Vec<EventRecord>> {
        let Some(value) = self.store.fetch(paths::EVENTS_ROOT).await? else {
            return Ok(Vec::new());
        };
        let entries: Vec<(String, Value)> = match value {
            Value::Object(entries) => entries.into_iter().collect(),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .filter(|(_, item)| !item.is_null())
                .map(|(index, item)| (index.to_string(), item))
                .collect(),
            _ => {
                return Err(MembershipError::Malformed {
                    path: paths::EVENTS_ROOT.to_string(),
                    reason: "expected an object keyed by event id".to_string(),
                })
            }
        };

        let mut events = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let path = format!("{}/{}", paths::EVENTS_ROOT, key);
            match decode::<EventRecord>(&path, value) {
                Ok(mut event) => {
                    if event.id.as_str().is_empty() {
                        event.id = EventId::new(key);
                    }
                    events.push(event);
                }
                Err(err) => warn!("[vr-02] skipping event: {}", err),
            }
        }
        events.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(events)
    }

    /// Fetch the events in one of a user's collections.
    ///
    /// Events are fetched concurrently, bounded by `query_concurrency`.
    /// Ids whose record no longer exists or fails to decode are skipped.
    pub async fn user_events(
        &self,
        user_id: &UserId,
        kind: UserEventKind,
    ) -> MembershipResult<Vec<EventRecord>> {
        let user = self.load_user(user_id).await?;
        let ids: Vec<EventId> = user.events(kind).iter().cloned().collect();

        let this = self;
        let results: Vec<(EventId, MembershipResult<EventRecord>)> = stream::iter(ids)
            .map(move |id| async move {
                let result = this.load_event(&id).await;
                (id, result)
            })
            .buffered(self.config.query_concurrency.max(1))
            .collect()
            .await;

        let mut events = Vec::with_capacity(results.len());
        for (id, result) in results {
            match result {
                Ok(event) => events.push(event),
                Err(MembershipError::NotFound { .. }) => {
                    warn!(
                        user_id = %user_id,
                        event_id = %id,
                        "[vr-02] {} references a missing event",
                        kind.user_field()
                    );
                }
                Err(err @ MembershipError::Malformed { .. }) => {
                    warn!(user_id = %user_id, "[vr-02] skipping event: {}", err);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(events)
    }
}
