//! # Integration Tests Crate
//!
//! Scenarios that drive the membership engine against the record store the
//! way a deployment does: many independent tasks sharing one store.
//!
//! ## Structure
//!
//! ```text
//! integration-tests/
//! ├── src/
//! │   ├── lib.rs               # This file
//! │   ├── harness.rs           # Shared store, service and whole-database checks
//! │   ├── flows.rs             # Sequential end-to-end roster flows
//! │   ├── race_conditions.rs   # Concurrent mutations of shared records
//! │   └── partial_failures.rs  # Store failures in the middle of dual writes
//! ```
//!
//! ## Key Difference: Logic Tests vs Race Tests
//!
//! - **Logic Tests**: "Does the third volunteer land on backup?"
//! - **Race Tests**: "Does it still, when fifty volunteers press the button at once?"
//!
//! Every scenario ends by scanning the whole database for unmirrored
//! memberships and over-full events.

pub mod flows;
pub mod harness;
pub mod partial_failures;
pub mod race_conditions;
