//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shared_types::UserEventKind;

/// VR-Admin: run one membership operation against a database snapshot
#[derive(Parser, Debug)]
#[command(name = "vr-admin")]
#[command(about = "Run volunteer roster operations against a JSON database snapshot")]
pub struct Args {
    /// Database snapshot (JSON export with `events` and `users` roots)
    #[arg(short, long, default_value = "roster.json")]
    pub snapshot: PathBuf,

    /// Do not write the snapshot back after a mutation
    #[arg(long)]
    pub dry_run: bool,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// Operations.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register for an event (backup when full)
    Register {
        /// User id
        user: String,
        /// Event id
        event: String,
    },
    /// Register onto the backup list
    RegisterBackup {
        /// User id
        user: String,
        /// Event id
        event: String,
    },
    /// Remove from the assigned list, or the backup list with --backup
    Unregister {
        /// User id
        user: String,
        /// Event id
        event: String,
        /// Target the backup list
        #[arg(long)]
        backup: bool,
    },
    /// Move from backup to assigned
    Promote {
        /// User id
        user: String,
        /// Event id
        event: String,
    },
    /// Move from assigned to backup
    Demote {
        /// User id
        user: String,
        /// Event id
        event: String,
    },
    /// Add or remove an event from a user's saved events
    ToggleSaved {
        /// User id
        user: String,
        /// Event id
        event: String,
    },
    /// Mark an event done
    CloseOut {
        /// Event id
        event: String,
    },
    /// Show one event
    Event {
        /// Event id
        event: String,
    },
    /// List all events
    Events,
    /// List the events in one of a user's collections
    UserEvents {
        /// User id
        user: String,
        /// registered | backup | saved | past
        #[arg(long, default_value = "registered")]
        kind: UserEventKind,
    },
}

impl Command {
    /// True for operations that may change the database.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Self::Event { .. } | Self::Events | Self::UserEvents { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unregister_backup() {
        let args = Args::try_parse_from([
            "vr-admin",
            "--snapshot",
            "db.json",
            "unregister",
            "u1",
            "e1",
            "--backup",
        ])
        .unwrap();

        assert_eq!(args.snapshot, PathBuf::from("db.json"));
        assert_eq!(
            args.command,
            Command::Unregister {
                user: "u1".to_string(),
                event: "e1".to_string(),
                backup: true
            }
        );
        assert!(args.command.is_mutation());
    }

    #[test]
    fn test_parse_user_events_kind() {
        let args = Args::try_parse_from(["vr-admin", "user-events", "u1", "--kind", "saved"]).unwrap();
        assert_eq!(
            args.command,
            Command::UserEvents {
                user: "u1".to_string(),
                kind: UserEventKind::Saved
            }
        );
        assert!(!args.command.is_mutation());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(Args::try_parse_from(["vr-admin", "user-events", "u1", "--kind", "soon"]).is_err());
    }
}
