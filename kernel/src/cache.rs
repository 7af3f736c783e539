mod config;
mod key;

pub use self::{config::*, key::*};
use crate::KernelError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Invalidation generation of a key's scope, observed before a read-through load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CacheCheckpoint(u64);

impl CacheCheckpoint {
    pub fn new(generation: u64) -> Self {
        Self(generation)
    }

    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Process-local snapshot cache in front of the read paths.
///
/// Implementations store compressed serialized values with a sliding expiration of `ttl`
/// and an absolute expiration of twice that, and keep every stored key in a tracked set
/// so that [`CacheStore::remove_by_prefix`] can find it.
pub trait CacheStore: 'static + Sync + Send {
    fn get<T: DeserializeOwned>(&self, key: &CacheKey)
        -> error_stack::Result<Option<T>, KernelError>;

    fn set<T: Serialize + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> error_stack::Result<(), KernelError>;

    fn checkpoint(&self, key: &CacheKey) -> CacheCheckpoint;

    /// Stores the value only if nothing in the key's scope was invalidated since `checkpoint`.
    /// Returns whether the value was stored.
    fn populate<T: Serialize + Sync>(
        &self,
        checkpoint: CacheCheckpoint,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> error_stack::Result<bool, KernelError>;

    fn remove(&self, key: &CacheKey) -> error_stack::Result<(), KernelError>;

    fn remove_by_prefix(&self, prefix: &CachePrefix) -> error_stack::Result<usize, KernelError>;

    fn clear(&self) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnCacheStore: 'static + Sync + Send {
    type CacheStore: CacheStore;
    fn cache_store(&self) -> &Self::CacheStore;
}
