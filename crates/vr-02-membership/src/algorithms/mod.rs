//! # Algorithms
//!
//! - `placement.rs` - Which list a registration lands on
//! - `saga.rs` - Reassignment state machine

pub mod placement;
pub mod saga;

pub use placement::{decide_placement, PlacementDecision};
pub use saga::ReassignmentSaga;
