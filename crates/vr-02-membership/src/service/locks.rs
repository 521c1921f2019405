//! Per-record async locks.
//!
//! One `tokio` mutex slot per record path, created on demand. A guard holds
//! the slots of every record an operation touches; slots are taken in sorted
//! key order so two operations sharing records cannot deadlock. Slots no one
//! holds or waits on are dropped when a guard is released.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::trace;

type Slot = Arc<AsyncMutex<()>>;

/// Lock table keyed by record path.
#[derive(Default)]
pub struct KeyLocks {
    slots: Arc<Mutex<HashMap<String, Slot>>>,
}

impl KeyLocks {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock every key in `keys`, waiting as needed.
    ///
    /// Cancelling the returned future releases and prunes any slot already
    /// taken.
    pub async fn acquire<I, K>(&self, keys: I) -> KeyGuard
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        keys.sort();
        keys.dedup();

        let mut guard = KeyGuard {
            held: Vec::with_capacity(keys.len()),
            keys,
            slots: Arc::clone(&self.slots),
        };
        for index in 0..guard.keys.len() {
            let slot = self.slot(&guard.keys[index]);
            let held = slot.lock_owned().await;
            guard.held.push(held);
            trace!("[vr-02] locked {}", guard.keys[index]);
        }
        guard
    }

    /// Number of live slots.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// True when no slot is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: &str) -> Slot {
        let mut slots = self.slots.lock();
        Arc::clone(
            slots
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
        )
    }
}

/// Held locks; released on drop.
pub struct KeyGuard {
    keys: Vec<String>,
    held: Vec<OwnedMutexGuard<()>>,
    slots: Arc<Mutex<HashMap<String, Slot>>>,
}

impl KeyGuard {
    /// Locked keys, sorted.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        self.held.clear();

        // The table holds one reference per slot; anything above that is a
        // waiter or another holder.
        let mut slots = self.slots.lock();
        for key in &self.keys {
            if slots.get(key).is_some_and(|slot| Arc::strong_count(slot) == 1) {
                slots.remove(key);
            }
        }
    }
}
