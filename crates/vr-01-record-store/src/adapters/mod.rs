//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound store ports.

mod fault_injection;
mod in_memory;

pub use fault_injection::{FaultInjectingStore, FaultOp};
pub use in_memory::InMemoryRecordStore;
