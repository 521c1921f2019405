//! Saved-events toggle.

use shared_types::{paths, EventId, UserEventKind, UserId};
use tracing::{info, warn};
use vr_01_record_store::RecordStore;

use super::MembershipService;
use crate::domain::SavedToggleOutcome;

impl<S: RecordStore> MembershipService<S> {
    /// Flip `event_id` in the user's saved set. Never gated by the
    /// closed-event policy.
    pub async fn toggle_saved(&self, user_id: &UserId, event_id: &EventId) -> SavedToggleOutcome {
        let _guard = self.locks.acquire([paths::user(user_id)]).await;

        let mut outcome = SavedToggleOutcome {
            user_id: user_id.clone(),
            event_id: event_id.clone(),
            is_saved: false,
            error: None,
        };

        if let Err(err) = self.load_event(event_id).await {
            outcome.error = Some(err);
            return outcome;
        }
        let user = match self.load_user(user_id).await {
            Ok(user) => user,
            Err(err) => {
                outcome.error = Some(err);
                return outcome;
            }
        };

        let was_saved = user.saved_events.contains(event_id);
        let mut saved = user.saved_events;
        if was_saved {
            saved.remove(event_id);
        } else {
            saved.insert(event_id.clone());
        }

        let path = paths::user_events(user_id, UserEventKind::Saved);
        match self.write_set(&path, &saved).await {
            Ok(()) => {
                outcome.is_saved = !was_saved;
                info!(
                    event_id = %event_id,
                    user_id = %user_id,
                    "[vr-02] {} saved events",
                    if was_saved { "removed from" } else { "added to" }
                );
            }
            Err(err) => {
                warn!(event_id = %event_id, user_id = %user_id, "[vr-02] saved toggle failed: {}", err);
                outcome.is_saved = was_saved;
                outcome.error = Some(err);
            }
        }
        outcome
    }
}
