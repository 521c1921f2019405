//! # Shared Types Crate
//!
//! Record shapes and identifiers shared by the record store, the membership
//! engine and the admin tooling.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the JSON layout of event and user records is
//!   defined once, here.
//! - **Denormalized Membership**: an event lists its volunteers, a user lists
//!   its events. Nothing in the store links the two; keeping them mirrored is
//!   the job of `vr-02-membership`.
//! - **Lazy Collections**: every membership set may be absent in the store and
//!   decodes to an empty set.

pub mod entities;
pub mod errors;
pub mod id_set;
pub mod paths;

pub use entities::*;
pub use errors::*;
