mod codec;
mod store;
mod tracker;

use std::sync::Arc;
use std::time::Duration;

use error_stack::{Report, ResultExt};
use kernel::interface::cache::{
    CacheCheckpoint, CacheConfig, CacheKey, CachePrefix, CacheStore,
};
use kernel::KernelError;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use self::store::EvictionReason;
use self::store::ExpiringStore;
use self::tracker::KeyTracker;
use crate::env_or;

const CACHE_MAX_ENTRIES: &str = "CACHE_MAX_ENTRIES";
const CACHE_COMPRESSION_LEVEL: &str = "CACHE_COMPRESSION_LEVEL";
const CACHE_PURGE_INTERVAL_SECS: &str = "CACHE_PURGE_INTERVAL_SECS";

pub fn load_cache_config() -> error_stack::Result<CacheConfig, KernelError> {
    let default = CacheConfig::default();
    Ok(CacheConfig::new(
        env_or(CACHE_MAX_ENTRIES, *default.max_entries())?,
        env_or(CACHE_COMPRESSION_LEVEL, *default.compression_level())?,
        purge_interval(env_or(
            CACHE_PURGE_INTERVAL_SECS,
            default.purge_interval().as_secs(),
        )?)?,
    ))
}

fn purge_interval(secs: u64) -> error_stack::Result<Duration, KernelError> {
    if secs == 0 {
        return Err(Report::new(KernelError::InvalidInput)
            .attach_printable(format!("`{CACHE_PURGE_INTERVAL_SECS}` must be at least 1")));
    }
    Ok(Duration::from_secs(secs))
}

/// Process-wide compressed snapshot cache.
///
/// Created once at service start and shared by cloning; [`MemoryCache::shutdown`] drops
/// every entry and tracked key. The key tracker and the entry store are guarded by separate
/// locks, always taken in that order, and neither is held across an await.
#[derive(Clone)]
pub struct MemoryCache {
    inner: Arc<Inner>,
}

struct Inner {
    tracker: Arc<KeyTracker>,
    store: ExpiringStore,
    config: CacheConfig,
}

impl MemoryCache {
    pub fn new(config: CacheConfig) -> Self {
        let tracker = Arc::new(KeyTracker::default());
        let listener = Arc::clone(&tracker);
        let store = ExpiringStore::new(
            *config.max_entries(),
            Box::new(move |key, stamp, _reason| listener.forget(key, stamp)),
        );
        Self {
            inner: Arc::new(Inner {
                tracker,
                store,
                config,
            }),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    /// Removes expired entries eagerly. Returns how many were dropped.
    pub fn purge_expired(&self) -> error_stack::Result<usize, KernelError> {
        let evictions = self.inner.store.purge_expired()?;
        Ok(evictions.len())
    }

    /// Number of stored entries and number of tracked keys.
    pub fn len(&self) -> error_stack::Result<(usize, usize), KernelError> {
        let tracked = self.inner.tracker.lock()?.len();
        Ok((self.inner.store.len()?, tracked))
    }

    pub fn is_empty(&self) -> error_stack::Result<bool, KernelError> {
        Ok(self.inner.store.len()? == 0)
    }

    pub fn shutdown(&self) -> error_stack::Result<(), KernelError> {
        self.clear()?;
        tracing::info!("Cache cleared on shutdown");
        Ok(())
    }

    fn store_tracked(
        &self,
        checkpoint: Option<CacheCheckpoint>,
        key: &CacheKey,
        data: Vec<u8>,
        ttl: Duration,
    ) -> error_stack::Result<bool, KernelError> {
        let evictions = {
            let mut tracked = self.inner.tracker.lock()?;
            if let Some(checkpoint) = checkpoint {
                if tracked.generation(key.as_str()) != checkpoint.generation() {
                    return Ok(false);
                }
            }
            let stamp = tracked.track(key.as_str());
            self.inner.store.insert(
                key.as_str().to_string(),
                data,
                stamp,
                key.priority(),
                ttl,
            )?
        };
        drop(evictions);
        Ok(true)
    }
}

impl CacheStore for MemoryCache {
    fn get<T: DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> error_stack::Result<Option<T>, KernelError> {
        let (data, evictions) = self.inner.store.get(key.as_str())?;
        drop(evictions);
        let Some(data) = data else {
            return Ok(None);
        };
        match codec::decompress(&data) {
            Ok(value) => Ok(Some(value)),
            Err(report) => {
                self.remove(key)?;
                Err(report).attach_printable_lazy(|| format!("Dropped unreadable entry {key}"))
            }
        }
    }

    fn set<T: Serialize + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> error_stack::Result<(), KernelError> {
        let data = codec::compress(value, *self.inner.config.compression_level())?;
        self.store_tracked(None, key, data, ttl).map(|_| ())
    }

    fn checkpoint(&self, key: &CacheKey) -> CacheCheckpoint {
        let generation = match self.inner.tracker.lock() {
            Ok(tracked) => tracked.generation(key.as_str()),
            // A checkpoint that can never match makes populate a no-op.
            Err(_) => u64::MAX,
        };
        CacheCheckpoint::new(generation)
    }

    fn populate<T: Serialize + Sync>(
        &self,
        checkpoint: CacheCheckpoint,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> error_stack::Result<bool, KernelError> {
        let data = codec::compress(value, *self.inner.config.compression_level())?;
        self.store_tracked(Some(checkpoint), key, data, ttl)
    }

    fn remove(&self, key: &CacheKey) -> error_stack::Result<(), KernelError> {
        let mut tracked = self.inner.tracker.lock()?;
        tracked.invalidate(key.as_str());
        self.inner.store.remove(key.as_str())?;
        Ok(())
    }

    fn remove_by_prefix(&self, prefix: &CachePrefix) -> error_stack::Result<usize, KernelError> {
        let mut tracked = self.inner.tracker.lock()?;
        let keys = tracked.invalidate_prefix(prefix.as_str());
        let removed = self.inner.store.remove_all(&keys)?;
        tracing::debug!("Invalidated {removed} cache entries under {prefix}");
        Ok(removed)
    }

    fn clear(&self) -> error_stack::Result<(), KernelError> {
        let mut tracked = self.inner.tracker.lock()?;
        tracked.invalidate_all();
        self.inner.store.clear()
    }
}
