//! # Core Domain Entities
//!
//! Event and user records as they are stored, and the selectors naming
//! their membership collections.
//!
//! ## Clusters
//!
//! - **Identity**: `EventId`, `UserId`
//! - **Records**: `EventRecord`, `VolunteerQuota`, `UserRecord`
//! - **Selectors**: `ListKind`, `UserEventKind`

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ParseKindError;
use crate::id_set;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap a raw id.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw id.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

record_id!(
    /// Key of an event record (`events/{id}`).
    EventId
);

record_id!(
    /// Key of a user record (`users/{id}`).
    UserId
);

// =============================================================================
// CLUSTER B: SELECTORS
// =============================================================================

/// Which pair of membership collections an operation touches.
///
/// | Kind | Event side | User side |
/// |------|------------|-----------|
/// | `Active` | `assignedVolunteers` | `registeredEvents` |
/// | `Backup` | `backupVolunteers` | `backupEvents` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// The capacity-bounded assigned list.
    Active,
    /// The unbounded waiting list.
    Backup,
}

impl ListKind {
    /// Field name of the event-side collection.
    pub fn event_field(&self) -> &'static str {
        match self {
            Self::Active => "assignedVolunteers",
            Self::Backup => "backupVolunteers",
        }
    }

    /// Field name of the mirrored user-side collection.
    pub fn user_field(&self) -> &'static str {
        match self {
            Self::Active => "registeredEvents",
            Self::Backup => "backupEvents",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Backup => f.write_str("backup"),
        }
    }
}

/// Event collections held on a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserEventKind {
    /// `registeredEvents`
    Registered,
    /// `backupEvents`
    Backup,
    /// `savedEvents`
    Saved,
    /// `pastEvents`
    Past,
}

impl UserEventKind {
    /// Field name on the user record.
    pub fn user_field(&self) -> &'static str {
        match self {
            Self::Registered => "registeredEvents",
            Self::Backup => "backupEvents",
            Self::Saved => "savedEvents",
            Self::Past => "pastEvents",
        }
    }
}

impl From<ListKind> for UserEventKind {
    fn from(list: ListKind) -> Self {
        match list {
            ListKind::Active => Self::Registered,
            ListKind::Backup => Self::Backup,
        }
    }
}

impl FromStr for UserEventKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "registered" | "registeredevents" => Ok(Self::Registered),
            "backup" | "backupevents" => Ok(Self::Backup),
            "saved" | "savedevents" => Ok(Self::Saved),
            "past" | "pastevents" => Ok(Self::Past),
            _ => Err(ParseKindError(s.to_string())),
        }
    }
}

// =============================================================================
// CLUSTER C: RECORDS
// =============================================================================

/// Volunteer quota of an event (`volunteers` object).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerQuota {
    /// Capacity of the assigned list.
    pub max: u32,
}

/// An event as stored at `events/{id}`.
///
/// Only the fields the membership engine reads are modelled; any other field
/// written by the event editor is ignored on decode and never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Event id. Older records may omit it; readers fill it from the path.
    #[serde(default)]
    pub id: EventId,
    /// Volunteer quota.
    pub volunteers: VolunteerQuota,
    /// Users holding a seat.
    #[serde(default, with = "id_set", skip_serializing_if = "BTreeSet::is_empty")]
    pub assigned_volunteers: BTreeSet<UserId>,
    /// Users on the waiting list.
    #[serde(default, with = "id_set", skip_serializing_if = "BTreeSet::is_empty")]
    pub backup_volunteers: BTreeSet<UserId>,
    /// Terminal marker set by close-out.
    #[serde(default)]
    pub is_done: bool,
}

impl EventRecord {
    /// Create an open event with an empty roster.
    pub fn new(id: impl Into<EventId>, max: u32) -> Self {
        Self {
            id: id.into(),
            volunteers: VolunteerQuota { max },
            assigned_volunteers: BTreeSet::new(),
            backup_volunteers: BTreeSet::new(),
            is_done: false,
        }
    }

    /// Members of the given list.
    pub fn members(&self, list: ListKind) -> &BTreeSet<UserId> {
        match list {
            ListKind::Active => &self.assigned_volunteers,
            ListKind::Backup => &self.backup_volunteers,
        }
    }

    /// Capacity of the assigned list.
    pub fn capacity(&self) -> usize {
        self.volunteers.max as usize
    }

    /// True once the assigned list has reached capacity.
    pub fn is_full(&self) -> bool {
        self.assigned_volunteers.len() >= self.capacity()
    }
}

/// A user as stored at `users/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// User id. Older records may omit it; readers fill it from the path.
    #[serde(default)]
    pub id: UserId,
    /// Events the user holds a seat at.
    #[serde(default, with = "id_set", skip_serializing_if = "BTreeSet::is_empty")]
    pub registered_events: BTreeSet<EventId>,
    /// Events the user is waiting for.
    #[serde(default, with = "id_set", skip_serializing_if = "BTreeSet::is_empty")]
    pub backup_events: BTreeSet<EventId>,
    /// Bookmarked events.
    #[serde(default, with = "id_set", skip_serializing_if = "BTreeSet::is_empty")]
    pub saved_events: BTreeSet<EventId>,
    /// Events the user took part in. Maintained outside the engine.
    #[serde(default, with = "id_set", skip_serializing_if = "BTreeSet::is_empty")]
    pub past_events: BTreeSet<EventId>,
}

impl UserRecord {
    /// Create a user with no memberships.
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// The collection mirroring an event-side list.
    pub fn mirror(&self, list: ListKind) -> &BTreeSet<EventId> {
        self.events(list.into())
    }

    /// Any event collection of the user.
    pub fn events(&self, kind: UserEventKind) -> &BTreeSet<EventId> {
        match kind {
            UserEventKind::Registered => &self.registered_events,
            UserEventKind::Backup => &self.backup_events,
            UserEventKind::Saved => &self.saved_events,
            UserEventKind::Past => &self.past_events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_record_decodes_lazy_collections() {
        let event: EventRecord = serde_json::from_value(json!({
            "id": "e1",
            "title": "Beach cleanup",
            "volunteers": { "max": 2, "min": 1 }
        }))
        .unwrap();

        assert_eq!(event.id, EventId::from("e1"));
        assert!(event.assigned_volunteers.is_empty());
        assert!(event.backup_volunteers.is_empty());
        assert!(!event.is_done);
    }

    #[test]
    fn test_event_record_decodes_keyed_sets() {
        let event: EventRecord = serde_json::from_value(json!({
            "volunteers": { "max": 1 },
            "assignedVolunteers": { "u1": "u1" },
            "backupVolunteers": { "u2": "u2", "u3": "u3" },
            "isDone": true
        }))
        .unwrap();

        assert!(event.members(ListKind::Active).contains(&UserId::from("u1")));
        assert_eq!(event.members(ListKind::Backup).len(), 2);
        assert!(event.is_full());
        assert!(event.is_done);
    }

    #[test]
    fn test_event_record_requires_quota() {
        let result = serde_json::from_value::<EventRecord>(json!({ "id": "e1" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_event_record_encodes_sets_as_maps() {
        let mut event = EventRecord::new("e1", 3);
        event.assigned_volunteers.insert(UserId::from("u1"));

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["assignedVolunteers"], json!({ "u1": "u1" }));
        assert!(value.get("backupVolunteers").is_none());
        assert_eq!(value["volunteers"]["max"], json!(3));
    }

    #[test]
    fn test_is_full_when_over_capacity() {
        let mut event = EventRecord::new("e1", 2);
        assert!(!event.is_full());
        event.assigned_volunteers.insert(UserId::from("u1"));
        event.assigned_volunteers.insert(UserId::from("u2"));
        event.assigned_volunteers.insert(UserId::from("u3"));
        assert!(event.is_full());
    }

    #[test]
    fn test_user_mirror_matches_list_kind() {
        let mut user = UserRecord::new("u1");
        user.backup_events.insert(EventId::from("e1"));

        assert!(user.backup_events.contains(&EventId::from("e1")));
        assert!(user.mirror(ListKind::Active).is_empty());
        assert_eq!(user.events(UserEventKind::Backup).len(), 1);
    }

    #[test]
    fn test_list_kind_fields() {
        assert_eq!(ListKind::Active.event_field(), "assignedVolunteers");
        assert_eq!(ListKind::Active.user_field(), "registeredEvents");
        assert_eq!(ListKind::Backup.event_field(), "backupVolunteers");
        assert_eq!(ListKind::Backup.user_field(), "backupEvents");
    }

    #[test]
    fn test_user_event_kind_parse() {
        assert_eq!("saved".parse::<UserEventKind>().unwrap(), UserEventKind::Saved);
        assert_eq!(
            "registeredEvents".parse::<UserEventKind>().unwrap(),
            UserEventKind::Registered
        );
        assert!("upcoming".parse::<UserEventKind>().is_err());
    }
}
