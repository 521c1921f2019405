//! Dispatch of one command against a loaded snapshot.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use shared_types::{EventId, ListKind, UserId};
use tracing::{info, Instrument};
use vr_01_record_store::InMemoryRecordStore;
use vr_02_membership::{MembershipApi, MembershipConfig, MembershipService};

use crate::cli::Command;

/// What a command produced.
#[derive(Debug)]
pub struct RunResult {
    /// Outcome or query result, ready to print.
    pub output: Value,
    /// Database after the command.
    pub snapshot: Value,
}

/// Run `command` against `snapshot`.
pub async fn run(command: &Command, snapshot: Value, config: MembershipConfig) -> Result<RunResult> {
    let store = Arc::new(InMemoryRecordStore::from_snapshot(snapshot));
    let service = MembershipService::new(Arc::clone(&store), config);
    let span = vr_telemetry::subsystem_span!("vr-admin", subsystem = "membership");

    let output = execute(&service, command).instrument(span).await?;
    info!(writes = store.writes(), "command finished");

    Ok(RunResult {
        output,
        snapshot: store.snapshot(),
    })
}

async fn execute(api: &dyn MembershipApi, command: &Command) -> Result<Value> {
    match command {
        Command::Register { user, event } => {
            let (user, event) = pair(user, event);
            to_json(api.register(&user, &event).await)
        }
        Command::RegisterBackup { user, event } => {
            let (user, event) = pair(user, event);
            to_json(api.register_backup(&user, &event).await)
        }
        Command::Unregister { user, event, backup } => {
            let (user, event) = pair(user, event);
            let list = if *backup { ListKind::Backup } else { ListKind::Active };
            to_json(api.unregister(&user, &event, list).await)
        }
        Command::Promote { user, event } => {
            let (user, event) = pair(user, event);
            to_json(api.promote_from_backup(&user, &event).await)
        }
        Command::Demote { user, event } => {
            let (user, event) = pair(user, event);
            to_json(api.demote_to_backup(&user, &event).await)
        }
        Command::ToggleSaved { user, event } => {
            let (user, event) = pair(user, event);
            to_json(api.toggle_saved(&user, &event).await)
        }
        Command::CloseOut { event } => to_json(api.close_out(&EventId::from(event.as_str())).await),
        Command::Event { event } => to_json(api.event(&EventId::from(event.as_str())).await?),
        Command::Events => to_json(api.events().await?),
        Command::UserEvents { user, kind } => {
            to_json(api.user_events(&UserId::from(user.as_str()), *kind).await?)
        }
    }
}

fn pair(user: &str, event: &str) -> (UserId, EventId) {
    (UserId::from(user), EventId::from(event))
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn roster() -> Value {
        json!({
            "events": { "e1": { "id": "e1", "volunteers": { "max": 1 } } },
            "users": { "u1": { "id": "u1" }, "u2": { "id": "u2" } }
        })
    }

    fn register(user: &str) -> Command {
        Command::Register {
            user: user.to_string(),
            event: "e1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_updates_snapshot() {
        let result = run(&register("u1"), roster(), MembershipConfig::for_testing())
            .await
            .unwrap();

        assert_eq!(result.output["event_side_written"], true);
        assert_eq!(result.output["placement"]["list"], "assigned");
        assert_eq!(
            result.snapshot["events"]["e1"]["assignedVolunteers"],
            json!({ "u1": "u1" })
        );
        assert_eq!(result.snapshot["users"]["u1"]["registeredEvents"], json!({ "e1": "e1" }));
    }

    #[tokio::test]
    async fn test_failed_outcome_is_output_not_error() {
        let result = run(
            &Command::Unregister {
                user: "u2".to_string(),
                event: "e1".to_string(),
                backup: false,
            },
            roster(),
            MembershipConfig::for_testing(),
        )
        .await
        .unwrap();

        assert_eq!(result.output["error"]["kind"], "membership_absent");
        assert_eq!(result.snapshot, roster());
    }

    #[tokio::test]
    async fn test_query_not_found_is_error() {
        let result = run(
            &Command::Event {
                event: "nope".to_string(),
            },
            roster(),
            MembershipConfig::for_testing(),
        )
        .await;

        assert!(result.is_err());
    }
}
