//! Fault-Injecting Store Adapter
//!
//! Wraps another record store and makes selected calls fail or slow down.
//! Used to exercise partial dual writes and to widen the window between a
//! read and the write that depends on it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::warn;

use crate::domain::{StoreError, StorePath};
use crate::ports::outbound::{KeyValueStore, SnapshotFetcher};

/// Operation a fault applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultOp {
    /// `fetch`
    Fetch,
    /// `store`
    Store,
}

#[derive(Clone, Debug)]
struct FaultRule {
    op: FaultOp,
    prefix: StorePath,
    /// Matching calls to let through before failing.
    skip: u32,
    /// Failures left; `None` fails forever.
    remaining: Option<u32>,
}

/// Store wrapper injecting failures and latency.
pub struct FaultInjectingStore<S> {
    inner: S,
    rules: Mutex<Vec<FaultRule>>,
    latency: Option<Duration>,
    injected: AtomicU64,
}

impl<S> FaultInjectingStore<S> {
    /// Wrap `inner` with no faults armed.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            rules: Mutex::new(Vec::new()),
            latency: None,
            injected: AtomicU64::new(0),
        }
    }

    /// Sleep this long before every call reaches the inner store.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Fail `op` calls on `prefix` or below. `times = None` fails forever;
    /// `Some(0)` arms nothing.
    pub fn fail(&self, op: FaultOp, prefix: &str, times: Option<u32>) -> Result<(), StoreError> {
        self.fail_after(op, prefix, 0, times)
    }

    /// Let `skip` matching calls through, then fail as [`Self::fail`] does.
    pub fn fail_after(
        &self,
        op: FaultOp,
        prefix: &str,
        skip: u32,
        times: Option<u32>,
    ) -> Result<(), StoreError> {
        let prefix = StorePath::parse(prefix)?;
        if times == Some(0) {
            return Ok(());
        }
        self.rules.lock().push(FaultRule {
            op,
            prefix,
            skip,
            remaining: times,
        });
        Ok(())
    }

    /// Fail writes on `prefix` or below.
    pub fn fail_writes_under(&self, prefix: &str, times: Option<u32>) -> Result<(), StoreError> {
        self.fail(FaultOp::Store, prefix, times)
    }

    /// Fail reads on `prefix` or below.
    pub fn fail_reads_under(&self, prefix: &str, times: Option<u32>) -> Result<(), StoreError> {
        self.fail(FaultOp::Fetch, prefix, times)
    }

    /// Disarm every rule.
    pub fn clear_faults(&self) {
        self.rules.lock().clear();
    }

    /// Number of calls failed so far.
    pub fn injected_failures(&self) -> u64 {
        self.injected.load(Ordering::Relaxed)
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Consume the first matching rule, if any.
    fn trip(&self, op: FaultOp, path: &StorePath) -> bool {
        let mut rules = self.rules.lock();
        let Some(index) = rules
            .iter()
            .position(|rule| rule.op == op && path.starts_with(&rule.prefix))
        else {
            return false;
        };

        let rule = &mut rules[index];
        if rule.skip > 0 {
            rule.skip -= 1;
            return false;
        }
        let exhausted = match rule.remaining.as_mut() {
            Some(remaining) => {
                *remaining = remaining.saturating_sub(1);
                *remaining == 0
            }
            None => false,
        };
        if exhausted {
            rules.remove(index);
        }
        self.injected.fetch_add(1, Ordering::Relaxed);
        true
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl<S: SnapshotFetcher> SnapshotFetcher for FaultInjectingStore<S> {
    async fn fetch(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.delay().await;
        let parsed = StorePath::parse(path)?;
        if self.trip(FaultOp::Fetch, &parsed) {
            warn!("[vr-01] injected read failure at {}", parsed);
            return Err(StoreError::ReadFailed {
                path: parsed.to_string(),
                reason: "injected fault".to_string(),
            });
        }
        self.inner.fetch(path).await
    }
}

#[async_trait]
impl<S: KeyValueStore> KeyValueStore for FaultInjectingStore<S> {
    async fn store(&self, path: &str, value: Value) -> Result<(), StoreError> {
        self.delay().await;
        let parsed = StorePath::parse(path)?;
        if self.trip(FaultOp::Store, &parsed) {
            warn!("[vr-01] injected write failure at {}", parsed);
            return Err(StoreError::WriteRejected {
                path: parsed.to_string(),
                reason: "injected fault".to_string(),
            });
        }
        self.inner.store(path, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRecordStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_no_rules_passes_through() {
        let store = FaultInjectingStore::new(InMemoryRecordStore::new());
        store.store("users/u1/savedEvents", json!({ "e1": "e1" })).await.unwrap();

        let saved = store.fetch("users/u1/savedEvents").await.unwrap();
        assert_eq!(saved, Some(json!({ "e1": "e1" })));
        assert_eq!(store.injected_failures(), 0);
    }

    #[tokio::test]
    async fn test_write_fault_limited_times() {
        let store = FaultInjectingStore::new(InMemoryRecordStore::new());
        store.fail_writes_under("users", Some(1)).unwrap();

        let first = store.store("users/u1/registeredEvents", json!({ "e1": "e1" })).await;
        let second = store.store("users/u1/registeredEvents", json!({ "e1": "e1" })).await;

        assert!(matches!(first, Err(StoreError::WriteRejected { .. })));
        assert!(second.is_ok());
        assert_eq!(store.injected_failures(), 1);
        assert_eq!(store.inner().writes(), 1);
    }

    #[tokio::test]
    async fn test_fault_only_matches_prefix() {
        let store = FaultInjectingStore::new(InMemoryRecordStore::new());
        store.fail_writes_under("users/u1", None).unwrap();

        assert!(store.store("users/u10/savedEvents", json!({ "e1": "e1" })).await.is_ok());
        assert!(store.store("users/u1/savedEvents", json!({ "e1": "e1" })).await.is_err());
        assert!(store.store("users/u1/savedEvents", json!({ "e1": "e1" })).await.is_err());
    }

    #[tokio::test]
    async fn test_read_fault() {
        let store = FaultInjectingStore::new(InMemoryRecordStore::new());
        store.fail_reads_under("events/e1", None).unwrap();

        let result = store.fetch("events/e1/assignedVolunteers").await;
        assert!(matches!(result, Err(StoreError::ReadFailed { .. })));
        assert!(store.fetch("events/e2").await.is_ok());
    }

    #[tokio::test]
    async fn test_fail_after_skips_first_calls() {
        let store = FaultInjectingStore::new(InMemoryRecordStore::new());
        store
            .fail_after(FaultOp::Store, "events/e1", 2, Some(1))
            .unwrap();

        assert!(store.store("events/e1/isDone", json!(true)).await.is_ok());
        assert!(store.store("events/e1/isDone", json!(true)).await.is_ok());
        assert!(store.store("events/e1/isDone", json!(true)).await.is_err());
        assert!(store.store("events/e1/isDone", json!(true)).await.is_ok());
    }

    #[tokio::test]
    async fn test_zero_times_injects_nothing() {
        let store = FaultInjectingStore::new(InMemoryRecordStore::new());
        store.fail_writes_under("users/u1", Some(0)).unwrap();

        assert!(store.store("users/u1/registeredEvents", json!({ "e1": "e1" })).await.is_ok());
        assert_eq!(store.injected_failures(), 0);
        assert_eq!(store.inner().writes(), 1);
    }

    #[tokio::test]
    async fn test_clear_faults() {
        let store = FaultInjectingStore::new(InMemoryRecordStore::new());
        store.fail_writes_under("events", None).unwrap();
        store.clear_faults();

        assert!(store.store("events/e1/isDone", json!(true)).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_applied() {
        let store = FaultInjectingStore::new(InMemoryRecordStore::new())
            .with_latency(Duration::from_millis(50));

        let started = tokio::time::Instant::now();
        store.fetch("events/e1").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
