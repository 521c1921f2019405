//! Store paths of records and membership collections.
//!
//! ```text
//! events/{eventId}
//! events/{eventId}/assignedVolunteers | backupVolunteers | isDone
//! users/{userId}
//! users/{userId}/registeredEvents | backupEvents | savedEvents | pastEvents
//! ```

use crate::entities::{EventId, ListKind, UserEventKind, UserId};
use crate::errors::KeyError;

/// Root of all event records.
pub const EVENTS_ROOT: &str = "events";

/// Root of all user records.
pub const USERS_ROOT: &str = "users";

/// Characters the store refuses inside a key.
pub const RESERVED_KEY_CHARS: [char; 6] = ['.', '#', '$', '[', ']', '/'];

/// Check that a raw id can be used as a single path segment.
pub fn validate_key(key: &str) -> Result<(), KeyError> {
    if key.is_empty() {
        return Err(KeyError::Empty);
    }
    if let Some(ch) = key
        .chars()
        .find(|c| RESERVED_KEY_CHARS.contains(c) || c.is_control())
    {
        return Err(KeyError::ReservedCharacter {
            key: key.to_string(),
            ch,
        });
    }
    Ok(())
}

/// `events/{id}`
pub fn event(id: &EventId) -> String {
    format!("{}/{}", EVENTS_ROOT, id)
}

/// `users/{id}`
pub fn user(id: &UserId) -> String {
    format!("{}/{}", USERS_ROOT, id)
}

/// Event-side collection of a list.
pub fn event_list(id: &EventId, list: ListKind) -> String {
    format!("{}/{}/{}", EVENTS_ROOT, id, list.event_field())
}

/// User-side collection mirroring a list.
pub fn user_list(id: &UserId, list: ListKind) -> String {
    user_events(id, list.into())
}

/// Any event collection of a user.
pub fn user_events(id: &UserId, kind: UserEventKind) -> String {
    format!("{}/{}/{}", USERS_ROOT, id, kind.user_field())
}

/// Terminal flag of an event.
pub fn event_done(id: &EventId) -> String {
    format!("{}/{}/isDone", EVENTS_ROOT, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_paths() {
        let event_id = EventId::from("e1");
        let user_id = UserId::from("u1");

        assert_eq!(event(&event_id), "events/e1");
        assert_eq!(
            event_list(&event_id, ListKind::Backup),
            "events/e1/backupVolunteers"
        );
        assert_eq!(user_list(&user_id, ListKind::Active), "users/u1/registeredEvents");
        assert_eq!(
            user_events(&user_id, UserEventKind::Saved),
            "users/u1/savedEvents"
        );
        assert_eq!(event_done(&event_id), "events/e1/isDone");
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("-NxA9_user").is_ok());
        assert_eq!(validate_key(""), Err(KeyError::Empty));
        assert!(matches!(
            validate_key("e1/assignedVolunteers"),
            Err(KeyError::ReservedCharacter { ch: '/', .. })
        ));
        assert!(validate_key("a.b").is_err());
        assert!(validate_key("tab\there").is_err());
    }
}
