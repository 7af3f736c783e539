use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use kernel::interface::cache::CachePriority;
use kernel::KernelError;
use tokio::time::Instant;

use crate::error::ConvertError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
    Expired,
    Capacity,
}

pub(crate) type EvictionListener = Box<dyn Fn(&str, u64, EvictionReason) + Send + Sync>;

struct Entry {
    data: Vec<u8>,
    stamp: u64,
    priority: CachePriority,
    sliding: Duration,
    last_access: Instant,
    expires_at: Instant,
}

impl Entry {
    fn new(data: Vec<u8>, stamp: u64, priority: CachePriority, ttl: Duration, now: Instant) -> Self {
        Self {
            data,
            stamp,
            priority,
            sliding: ttl,
            last_access: now,
            expires_at: now + ttl * 2,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at || now >= self.last_access + self.sliding
    }
}

/// Entries removed by the store itself. The listener is notified when this value is dropped,
/// so callers holding other locks can delay the notification until they released them.
#[must_use]
pub(crate) struct Evictions<'a> {
    evicted: Vec<(String, u64, EvictionReason)>,
    listener: &'a EvictionListener,
}

impl Evictions<'_> {
    pub(crate) fn len(&self) -> usize {
        self.evicted.len()
    }
}

impl Drop for Evictions<'_> {
    fn drop(&mut self) {
        for (key, stamp, reason) in self.evicted.drain(..) {
            tracing::debug!("Evicted cache entry {key} ({reason:?})");
            (self.listener)(&key, stamp, reason);
        }
    }
}

/// Size-bounded map of compressed snapshots with sliding and absolute expiration.
pub(crate) struct ExpiringStore {
    entries: Mutex<HashMap<String, Entry>>,
    max_entries: usize,
    listener: EvictionListener,
}

impl ExpiringStore {
    pub(crate) fn new(max_entries: usize, listener: EvictionListener) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries: max_entries.max(1),
            listener,
        }
    }

    fn evictions(&self, evicted: Vec<(String, u64, EvictionReason)>) -> Evictions<'_> {
        Evictions {
            evicted,
            listener: &self.listener,
        }
    }

    /// Returns a copy of the stored bytes and restarts the sliding window.
    pub(crate) fn get(
        &self,
        key: &str,
    ) -> error_stack::Result<(Option<Vec<u8>>, Evictions<'_>), KernelError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().convert_error()?;
        match entries.get_mut(key) {
            None => return Ok((None, self.evictions(Vec::new()))),
            Some(entry) if !entry.is_expired(now) => {
                entry.last_access = now;
                return Ok((Some(entry.data.clone()), self.evictions(Vec::new())));
            }
            Some(_) => {}
        }
        let evicted = entries
            .remove(key)
            .map(|entry| vec![(key.to_string(), entry.stamp, EvictionReason::Expired)])
            .unwrap_or_default();
        drop(entries);
        Ok((None, self.evictions(evicted)))
    }

    pub(crate) fn insert(
        &self,
        key: String,
        data: Vec<u8>,
        stamp: u64,
        priority: CachePriority,
        ttl: Duration,
    ) -> error_stack::Result<Evictions<'_>, KernelError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().convert_error()?;
        let mut evicted = Vec::new();
        if !entries.contains_key(&key) && entries.len() >= self.max_entries {
            Self::drain_expired(&mut entries, now, &mut evicted);
            while entries.len() >= self.max_entries {
                let victim = entries
                    .iter()
                    .min_by_key(|(_, entry)| (entry.priority, entry.last_access))
                    .map(|(key, _)| key.clone());
                let Some(victim) = victim else { break };
                if let Some(entry) = entries.remove(&victim) {
                    evicted.push((victim, entry.stamp, EvictionReason::Capacity));
                }
            }
        }
        entries.insert(key, Entry::new(data, stamp, priority, ttl, now));
        drop(entries);
        Ok(self.evictions(evicted))
    }

    pub(crate) fn remove(&self, key: &str) -> error_stack::Result<bool, KernelError> {
        let mut entries = self.entries.lock().convert_error()?;
        Ok(entries.remove(key).is_some())
    }

    pub(crate) fn remove_all<'k>(
        &self,
        keys: impl IntoIterator<Item = &'k String>,
    ) -> error_stack::Result<usize, KernelError> {
        let mut entries = self.entries.lock().convert_error()?;
        Ok(keys
            .into_iter()
            .filter(|key| entries.remove(key.as_str()).is_some())
            .count())
    }

    pub(crate) fn clear(&self) -> error_stack::Result<(), KernelError> {
        self.entries.lock().convert_error()?.clear();
        Ok(())
    }

    pub(crate) fn purge_expired(&self) -> error_stack::Result<Evictions<'_>, KernelError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().convert_error()?;
        let mut evicted = Vec::new();
        Self::drain_expired(&mut entries, now, &mut evicted);
        drop(entries);
        Ok(self.evictions(evicted))
    }

    pub(crate) fn len(&self) -> error_stack::Result<usize, KernelError> {
        Ok(self.entries.lock().convert_error()?.len())
    }

    fn drain_expired(
        entries: &mut HashMap<String, Entry>,
        now: Instant,
        evicted: &mut Vec<(String, u64, EvictionReason)>,
    ) {
        entries.retain(|key, entry| {
            if entry.is_expired(now) {
                evicted.push((key.clone(), entry.stamp, EvictionReason::Expired));
                false
            } else {
                true
            }
        });
    }
}
