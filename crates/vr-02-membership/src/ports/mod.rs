//! # Ports Layer
//!
//! - `inbound.rs` - API offered to outer layers
//!
//! Outbound ports (`SnapshotFetcher`, `KeyValueStore`) live in
//! `vr-01-record-store`.

pub mod inbound;

pub use inbound::MembershipApi;
