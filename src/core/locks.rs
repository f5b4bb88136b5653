use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::PairKey;

/// Arena of per-pair mutexes
///
/// Work for one pair key runs under that pair's mutex only; the arena map is
/// locked just long enough to fetch or prune an entry, so work on disjoint
/// pairs never waits on each other. Entries are dropped once no caller holds
/// them.
#[derive(Debug, Default)]
pub struct PairLocks {
    slots: Mutex<HashMap<PairKey, Arc<Mutex<()>>>>,
}

// The guarded data is `()`, so a poisoned lock carries no broken state.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poison| poison.into_inner())
}

impl PairLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the mutex for `key`
    pub fn with_pair<R>(&self, key: &PairKey, f: impl FnOnce() -> R) -> R {
        let slot = {
            let mut slots = lock(&self.slots);
            Arc::clone(slots.entry(key.clone()).or_default())
        };

        let result = {
            let _guard = lock(&slot);
            f()
        };

        let mut slots = lock(&self.slots);
        // Only the map and this caller still hold the slot
        if Arc::strong_count(&slot) == 2 {
            slots.remove(key);
        }

        result
    }

    /// Number of pairs currently holding a slot
    pub fn active_pairs(&self) -> usize {
        lock(&self.slots).len()
    }
}
