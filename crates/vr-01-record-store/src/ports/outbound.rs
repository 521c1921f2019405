//! # Outbound Ports
//!
//! The two collaborator operations the membership engine consumes.
//!
//! Production: the hosted realtime database client (outside this workspace)
//! Testing: `InMemoryRecordStore`, optionally wrapped in `FaultInjectingStore`

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::StoreError;

/// Single-key snapshot reads.
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    /// Current value at `path`, or `None` when nothing is stored there.
    async fn fetch(&self, path: &str) -> Result<Option<Value>, StoreError>;
}

/// Whole-value writes.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Replace the value at `path`. `Value::Null` deletes it.
    async fn store(&self, path: &str, value: Value) -> Result<(), StoreError>;
}

/// Anything that can both fetch and store.
pub trait RecordStore: SnapshotFetcher + KeyValueStore {}

impl<T: SnapshotFetcher + KeyValueStore + ?Sized> RecordStore for T {}

#[async_trait]
impl<T: SnapshotFetcher + ?Sized> SnapshotFetcher for Arc<T> {
    async fn fetch(&self, path: &str) -> Result<Option<Value>, StoreError> {
        (**self).fetch(path).await
    }
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn store(&self, path: &str, value: Value) -> Result<(), StoreError> {
        (**self).store(path, value).await
    }
}
