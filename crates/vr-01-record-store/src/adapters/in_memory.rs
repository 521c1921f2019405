//! In-Memory Record Store Adapter
//!
//! Implements `SnapshotFetcher` and `KeyValueStore` over a single JSON tree,
//! with the same path semantics as the hosted database: writes replace whole
//! subtrees, `null` and empty objects are never stored, and emptied parents
//! vanish.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{StoreError, StorePath};
use crate::ports::outbound::{KeyValueStore, SnapshotFetcher};

/// In-memory record store.
///
/// Each call takes the tree lock once, so a single `fetch` or `store` is
/// atomic; nothing spans two calls.
pub struct InMemoryRecordStore {
    /// The whole database.
    root: RwLock<Value>,
    /// Successful `fetch` calls.
    reads: AtomicU64,
    /// Successful `store` calls.
    writes: AtomicU64,
}

impl InMemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::from_snapshot(Value::Object(Map::new()))
    }

    /// Create a store holding `snapshot` as its root.
    pub fn from_snapshot(snapshot: Value) -> Self {
        let root = match prune(snapshot) {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        Self {
            root: RwLock::new(root),
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    /// Copy of the whole tree.
    pub fn snapshot(&self) -> Value {
        self.root.read().clone()
    }

    /// Write without counting it, for test fixtures.
    pub fn seed(&self, path: &str, value: Value) -> Result<(), StoreError> {
        let path = StorePath::parse(path)?;
        write_at(&mut self.root.write(), path.segments(), prune(value));
        Ok(())
    }

    /// Read without counting it, for assertions.
    pub fn value_at(&self, path: &str) -> Option<Value> {
        let path = StorePath::parse(path).ok()?;
        lookup(&self.root.read(), &path).cloned()
    }

    /// Number of successful `fetch` calls.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of successful `store` calls.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotFetcher for InMemoryRecordStore {
    async fn fetch(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let parsed = StorePath::parse(path)?;
        let value = lookup(&self.root.read(), &parsed).cloned();
        self.reads.fetch_add(1, Ordering::Relaxed);

        debug!("[vr-01] fetch {} -> {}", parsed, if value.is_some() { "hit" } else { "absent" });
        Ok(value)
    }
}

#[async_trait]
impl KeyValueStore for InMemoryRecordStore {
    async fn store(&self, path: &str, value: Value) -> Result<(), StoreError> {
        let parsed = StorePath::parse(path)?;
        let value = prune(value);
        let deleting = value.is_null();

        write_at(&mut self.root.write(), parsed.segments(), value);
        self.writes.fetch_add(1, Ordering::Relaxed);

        debug!("[vr-01] {} {}", if deleting { "delete" } else { "store" }, parsed);
        Ok(())
    }
}

fn lookup<'a>(root: &'a Value, path: &StorePath) -> Option<&'a Value> {
    let mut node = root;
    for segment in path.segments() {
        node = match node {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    if is_empty(node) {
        None
    } else {
        Some(node)
    }
}

/// Replace the subtree at `segments` with `value` (already pruned).
fn write_at(node: &mut Value, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = match value {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        return;
    };

    // An array is the store's rendering of an index-keyed object; keep its
    // elements. Writing below a scalar replaces the scalar.
    if let Value::Array(items) = node {
        let items = std::mem::take(items);
        *node = Value::Object(index_keyed(items));
    } else if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    let Value::Object(map) = node else {
        return;
    };

    if rest.is_empty() {
        if value.is_null() {
            map.remove(head);
        } else {
            map.insert(head.clone(), value);
        }
        return;
    }

    let child = map
        .entry(head.clone())
        .or_insert_with(|| Value::Object(Map::new()));
    write_at(child, rest, value);
    if is_empty(child) {
        map.remove(head);
    }
}

/// Re-key array elements by index, dropping `null` holes.
fn index_keyed(items: Vec<Value>) -> Map<String, Value> {
    items
        .into_iter()
        .enumerate()
        .filter(|(_, item)| !item.is_null())
        .map(|(index, item)| (index.to_string(), item))
        .collect()
}

/// Drop `null` members and empty objects, bottom up. Returns `Null` when
/// nothing is left.
fn prune(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let pruned: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, prune(v)))
                .filter(|(_, v)| !v.is_null())
                .collect();
            if pruned.is_empty() {
                Value::Null
            } else {
                Value::Object(pruned)
            }
        }
        other => other,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_absent() {
        let store = InMemoryRecordStore::new();
        assert_eq!(store.fetch("events/e1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_and_fetch_nested() {
        let store = InMemoryRecordStore::new();
        store
            .store("events/e1", json!({ "id": "e1", "volunteers": { "max": 2 } }))
            .await
            .unwrap();

        let max = store.fetch("events/e1/volunteers/max").await.unwrap();
        assert_eq!(max, Some(json!(2)));
        assert_eq!(store.writes(), 1);
        assert_eq!(store.reads(), 1);
    }

    #[tokio::test]
    async fn test_store_replaces_whole_value() {
        let store = InMemoryRecordStore::new();
        store
            .store("events/e1/assignedVolunteers", json!({ "u1": "u1", "u2": "u2" }))
            .await
            .unwrap();
        store
            .store("events/e1/assignedVolunteers", json!({ "u3": "u3" }))
            .await
            .unwrap();

        assert_eq!(
            store.value_at("events/e1/assignedVolunteers"),
            Some(json!({ "u3": "u3" }))
        );
    }

    #[tokio::test]
    async fn test_store_null_deletes_and_prunes_parents() {
        let store = InMemoryRecordStore::new();
        store
            .store("users/u1/savedEvents", json!({ "e1": "e1" }))
            .await
            .unwrap();
        store.store("users/u1/savedEvents", Value::Null).await.unwrap();

        assert_eq!(store.value_at("users/u1"), None);
        assert_eq!(store.value_at("users"), None);
    }

    #[tokio::test]
    async fn test_store_empty_object_deletes() {
        let store = InMemoryRecordStore::new();
        store.seed("events/e1/id", json!("e1")).unwrap();
        store
            .seed("events/e1/backupVolunteers", json!({ "u1": "u1" }))
            .unwrap();

        store
            .store("events/e1/backupVolunteers", json!({}))
            .await
            .unwrap();

        assert_eq!(store.value_at("events/e1/backupVolunteers"), None);
        assert_eq!(store.value_at("events/e1/id"), Some(json!("e1")));
    }

    #[tokio::test]
    async fn test_store_below_scalar_replaces_it() {
        let store = InMemoryRecordStore::new();
        store.seed("events/e1/isDone", json!(false)).unwrap();
        store.store("events/e1/isDone/at", json!(7)).await.unwrap();

        assert_eq!(store.value_at("events/e1/isDone"), Some(json!({ "at": 7 })));
    }

    #[tokio::test]
    async fn test_invalid_path_rejected() {
        let store = InMemoryRecordStore::new();
        let result = store.store("events/e#1", json!(true)).await;
        assert!(matches!(result, Err(StoreError::InvalidPath { .. })));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_seed_is_not_counted() {
        let store = InMemoryRecordStore::new();
        store.seed("events/e1", json!({ "id": "e1" })).unwrap();
        assert_eq!(store.writes(), 0);
        assert_eq!(store.value_at("events/e1/id"), Some(json!("e1")));
    }

    #[test]
    fn test_from_snapshot_prunes() {
        let store = InMemoryRecordStore::from_snapshot(json!({
            "events": { "e1": { "id": "e1", "backupVolunteers": {} } },
            "users": null
        }));

        assert_eq!(store.snapshot(), json!({ "events": { "e1": { "id": "e1" } } }));
    }

    #[tokio::test]
    async fn test_store_below_array_keeps_siblings() {
        let store = InMemoryRecordStore::from_snapshot(json!({
            "events": [
                { "id": "0", "volunteers": { "max": 2 } },
                null,
                { "id": "2", "volunteers": { "max": 2 } }
            ]
        }));

        store
            .store("events/2/assignedVolunteers", json!({ "u1": "u1" }))
            .await
            .unwrap();

        assert_eq!(
            store.value_at("events/0"),
            Some(json!({ "id": "0", "volunteers": { "max": 2 } }))
        );
        assert_eq!(store.value_at("events/1"), None);
        assert_eq!(
            store.value_at("events/2"),
            Some(json!({
                "id": "2",
                "volunteers": { "max": 2 },
                "assignedVolunteers": { "u1": "u1" }
            }))
        );
    }

    #[tokio::test]
    async fn test_delete_inside_array_element() {
        let store = InMemoryRecordStore::from_snapshot(json!({
            "users": { "u1": { "savedEvents": ["e0", "e1"] } }
        }));

        store.store("users/u1/savedEvents/0", Value::Null).await.unwrap();

        assert_eq!(store.value_at("users/u1/savedEvents"), Some(json!({ "1": "e1" })));
    }

    #[test]
    fn test_array_index_lookup() {
        let store = InMemoryRecordStore::from_snapshot(json!({ "users": { "u1": { "pastEvents": ["e1", "e2"] } } }));
        assert_eq!(store.value_at("users/u1/pastEvents/1"), Some(json!("e2")));
    }
}
