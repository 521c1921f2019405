//! Event close-out.

use serde_json::Value;
use shared_types::{paths, EventId};
use tracing::{info, warn};
use vr_01_record_store::RecordStore;

use super::MembershipService;
use crate::domain::{CloseOutOutcome, MembershipError};

impl<S: RecordStore> MembershipService<S> {
    /// Mark the event done. Membership lists are left as they are.
    ///
    /// Takes the event lock so a registration already in flight finishes
    /// before the flag lands.
    pub async fn close_out(&self, event_id: &EventId) -> CloseOutOutcome {
        let _guard = self.locks.acquire([paths::event(event_id)]).await;

        let mut outcome = CloseOutOutcome {
            event_id: event_id.clone(),
            is_done: false,
            error: None,
        };

        if let Err(err) = self.load_event(event_id).await {
            outcome.error = Some(err);
            return outcome;
        }

        match self.store.store(&paths::event_done(event_id), Value::Bool(true)).await {
            Ok(()) => {
                outcome.is_done = true;
                info!(event_id = %event_id, "[vr-02] event closed");
            }
            Err(err) => {
                warn!(event_id = %event_id, "[vr-02] close-out failed: {}", err);
                outcome.error = Some(MembershipError::from(err));
            }
        }
        outcome
    }
}
