//! # Ports Layer
//!
//! - `outbound.rs` - Driven ports implemented by database adapters

pub mod outbound;

pub use outbound::{KeyValueStore, RecordStore, SnapshotFetcher};
