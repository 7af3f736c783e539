use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::{Mutex, MutexGuard};

use kernel::KernelError;

use crate::error::ConvertError;

/// Every key currently held by the store, with the stamp of the write that put it there.
///
/// This set is the only way prefix invalidation finds entries, so the store must report
/// every removal it performs on its own (see [`KeyTracker::forget`]).
#[derive(Default)]
pub(crate) struct KeyTracker {
    inner: Mutex<TrackedKeys>,
}

#[derive(Default)]
pub(crate) struct TrackedKeys {
    keys: BTreeMap<String, u64>,
    next_stamp: u64,
    /// Invalidation count per scope. Scopes never seen fall back to `base`.
    generations: HashMap<String, u64>,
    base: u64,
}

/// `domain:kind`, the first two segments of a key or prefix. Every prefix spans at least
/// these two segments, so it can only match keys of its own scope.
fn scope(key: &str) -> &str {
    match key.match_indices(':').nth(1) {
        Some((at, _)) => &key[..at],
        None => key,
    }
}

impl TrackedKeys {
    pub(crate) fn generation(&self, key: &str) -> u64 {
        self.generations
            .get(scope(key))
            .copied()
            .unwrap_or(self.base)
    }

    fn bump(&mut self, key: &str) {
        let base = self.base;
        *self
            .generations
            .entry(scope(key).to_string())
            .or_insert(base) += 1;
    }

    /// Registers a write and returns the stamp to store alongside the entry.
    pub(crate) fn track(&mut self, key: &str) -> u64 {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        self.keys.insert(key.to_string(), stamp);
        stamp
    }

    pub(crate) fn invalidate(&mut self, key: &str) {
        self.bump(key);
        self.keys.remove(key);
    }

    pub(crate) fn invalidate_prefix(&mut self, prefix: &str) -> Vec<String> {
        self.bump(prefix);
        let matched = self
            .keys
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect::<Vec<_>>();
        for key in &matched {
            self.keys.remove(key);
        }
        matched
    }

    pub(crate) fn invalidate_all(&mut self) {
        let highest = self.generations.values().copied().max().unwrap_or(self.base);
        self.base = highest.max(self.base) + 1;
        self.generations.clear();
        self.keys.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }
}

impl KeyTracker {
    pub(crate) fn lock(&self) -> error_stack::Result<MutexGuard<'_, TrackedKeys>, KernelError> {
        self.inner.lock().convert_error()
    }

    /// Drops the key unless it was written again after the evicted entry.
    pub(crate) fn forget(&self, key: &str, stamp: u64) {
        match self.inner.lock() {
            Ok(mut tracked) => {
                if tracked.keys.get(key) == Some(&stamp) {
                    tracked.keys.remove(key);
                }
            }
            Err(_) => tracing::warn!("Key tracker poisoned, could not forget {key}"),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::cache::tracker::KeyTracker;

    #[test]
    fn prefix_scan_stops_at_siblings() {
        let tracker = KeyTracker::default();
        let mut tracked = tracker.lock().unwrap();
        tracked.track("rent-orders:user:1:active");
        tracked.track("rent-orders:user:1:status:Agreed");
        tracked.track("rent-orders:user:10:active");
        tracked.track("rent-orders:user:2:active");
        let removed = tracked.invalidate_prefix("rent-orders:user:1:");
        assert_eq!(removed.len(), 2);
        assert_eq!(tracked.len(), 2);
    }

    #[test]
    fn stale_eviction_keeps_rewritten_key() {
        let tracker = KeyTracker::default();
        let first = tracker.lock().unwrap().track("k");
        let second = tracker.lock().unwrap().track("k");
        tracker.forget("k", first);
        assert_eq!(tracker.lock().unwrap().len(), 1);
        tracker.forget("k", second);
        assert_eq!(tracker.lock().unwrap().len(), 0);
    }

    #[test]
    fn invalidation_bumps_generation() {
        let tracker = KeyTracker::default();
        let mut tracked = tracker.lock().unwrap();
        let key = "rent-orders:user:1:active";
        let before = tracked.generation(key);
        tracked.invalidate(key);
        tracked.invalidate_prefix("rent-orders:user:2:");
        tracked.invalidate_all();
        assert_eq!(tracked.generation(key), before + 3);
    }

    #[test]
    fn generations_are_scoped() {
        let tracker = KeyTracker::default();
        let mut tracked = tracker.lock().unwrap();
        let offers = "rent-order-offers:order:1";
        let page = "rent-orders:page:30:0";
        let before = (tracked.generation(offers), tracked.generation(page));

        tracked.invalidate_prefix("rent-orders:user:1:");
        tracked.invalidate("rent-orders:id:1");
        assert_eq!((tracked.generation(offers), tracked.generation(page)), before);

        tracked.invalidate_prefix("rent-orders:page:");
        assert_eq!(tracked.generation(offers), before.0);
        assert!(tracked.generation(page) > before.1);

        let after_page = tracked.generation(page);
        tracked.invalidate_all();
        assert!(tracked.generation(offers) > before.0);
        assert!(tracked.generation(page) > after_page);
        assert!(tracked.generation("rent-orders:available:partner:9") > before.1);
    }
}
