//! # VR-01 Record Store
//!
//! Path-addressed access to the schemaless record store.
//!
//! **Subsystem ID:** 01
//! **Architecture:** Hexagonal (Ports/Adapters)
//!
//! ## Purpose
//!
//! The membership engine talks to the database through exactly two
//! operations:
//!
//! | Port | Operation | Semantics |
//! |------|-----------|-----------|
//! | `SnapshotFetcher` | `fetch(path)` | Current value or `None`; single-key read |
//! | `KeyValueStore` | `store(path, value)` | Whole-value replace; last write wins |
//!
//! There is no merge, no compare-and-swap and no multi-key transaction.
//! Storing `null` (or an empty object) deletes the path, and a path whose
//! children are all gone disappears with them.
//!
//! ## Module Structure
//!
//! ```text
//! vr-01-record-store/
//! ├── domain/          # StoreError, StorePath
//! ├── ports/           # SnapshotFetcher, KeyValueStore, RecordStore
//! └── adapters/        # InMemoryRecordStore, FaultInjectingStore
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{FaultInjectingStore, FaultOp, InMemoryRecordStore};
pub use domain::{StoreError, StorePath};
pub use ports::{KeyValueStore, RecordStore, SnapshotFetcher};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
