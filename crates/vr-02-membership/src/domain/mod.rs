//! # Domain Layer
//!
//! Errors, value objects, outcomes and invariants of the membership engine.

pub mod errors;
pub mod invariants;
pub mod outcomes;
pub mod value_objects;

pub use errors::*;
pub use invariants::*;
pub use outcomes::*;
pub use value_objects::*;
