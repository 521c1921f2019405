//! # Roster Flows
//!
//! Sequential scenarios across registration, reassignment, saved events,
//! close-out and queries.
