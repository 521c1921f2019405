//! Membership engine configuration.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::ClosedEventPolicy;

/// Default bound on concurrent record fetches in `user_events`.
pub const DEFAULT_QUERY_CONCURRENCY: usize = 16;

/// Configuration for [`crate::MembershipService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipConfig {
    /// Gating of membership mutations on closed events
    pub closed_event_policy: ClosedEventPolicy,

    /// Undo the event-side write when the user-side write fails
    pub compensate_partial_writes: bool,

    /// Concurrent fetches when resolving a user's event ids
    pub query_concurrency: usize,
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self {
            closed_event_policy: ClosedEventPolicy::default(),
            compensate_partial_writes: true,
            query_concurrency: DEFAULT_QUERY_CONCURRENCY,
        }
    }
}

impl MembershipConfig {
    /// Configuration for tests.
    pub fn for_testing() -> Self {
        Self {
            query_concurrency: 4,
            ..Self::default()
        }
    }

    /// Same configuration with another closed-event policy.
    pub fn with_closed_event_policy(mut self, policy: ClosedEventPolicy) -> Self {
        self.closed_event_policy = policy;
        self
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `VR_CLOSED_EVENT_POLICY`: open | reject-registrations | frozen (default: reject-registrations)
    /// - `VR_COMPENSATE`: Undo half-written registrations (default: true)
    /// - `VR_QUERY_CONCURRENCY`: Concurrent fetches in queries (default: 16)
    ///
    /// Unparsable values fall back to the default with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let closed_event_policy = lookup("VR_CLOSED_EVENT_POLICY")
            .and_then(|raw| match raw.parse::<ClosedEventPolicy>() {
                Ok(policy) => Some(policy),
                Err(err) => {
                    warn!("[vr-02] ignoring VR_CLOSED_EVENT_POLICY: {}", err);
                    None
                }
            })
            .unwrap_or(defaults.closed_event_policy);

        let compensate_partial_writes = lookup("VR_COMPENSATE")
            .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                other => {
                    warn!("[vr-02] ignoring VR_COMPENSATE={}", other);
                    None
                }
            })
            .unwrap_or(defaults.compensate_partial_writes);

        let query_concurrency = lookup("VR_QUERY_CONCURRENCY")
            .and_then(|raw| match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    warn!("[vr-02] ignoring VR_QUERY_CONCURRENCY={}", raw);
                    None
                }
            })
            .unwrap_or(defaults.query_concurrency);

        Self {
            closed_event_policy,
            compensate_partial_writes,
            query_concurrency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = MembershipConfig::default();
        assert_eq!(config.closed_event_policy, ClosedEventPolicy::RejectRegistrations);
        assert!(config.compensate_partial_writes);
        assert_eq!(config.query_concurrency, DEFAULT_QUERY_CONCURRENCY);
    }

    #[test]
    fn test_from_lookup_empty_uses_defaults() {
        assert_eq!(MembershipConfig::from_lookup(|_| None), MembershipConfig::default());
    }

    #[test]
    fn test_from_lookup_reads_values() {
        let config = MembershipConfig::from_lookup(lookup_from(&[
            ("VR_CLOSED_EVENT_POLICY", "frozen"),
            ("VR_COMPENSATE", "false"),
            ("VR_QUERY_CONCURRENCY", "3"),
        ]));

        assert_eq!(config.closed_event_policy, ClosedEventPolicy::Frozen);
        assert!(!config.compensate_partial_writes);
        assert_eq!(config.query_concurrency, 3);
    }

    #[test]
    fn test_from_lookup_invalid_values_fall_back() {
        let config = MembershipConfig::from_lookup(lookup_from(&[
            ("VR_CLOSED_EVENT_POLICY", "later"),
            ("VR_COMPENSATE", "maybe"),
            ("VR_QUERY_CONCURRENCY", "0"),
        ]));

        assert_eq!(config, MembershipConfig::default());
    }

    #[test]
    fn test_serde_kebab_policy() {
        let config = MembershipConfig::for_testing().with_closed_event_policy(ClosedEventPolicy::Open);
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["closed_event_policy"], "open");
    }
}
