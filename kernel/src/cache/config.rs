use destructure::Mutation;
use std::time::Duration;
use vodca::References;

#[derive(Debug, Clone, References, Mutation)]
pub struct CacheConfig {
    max_entries: usize,
    compression_level: i32,
    purge_interval: Duration,
}

impl CacheConfig {
    pub fn new(max_entries: usize, compression_level: i32, purge_interval: Duration) -> Self {
        Self {
            max_entries,
            compression_level,
            purge_interval,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            compression_level: 3,
            purge_interval: Duration::from_secs(30),
        }
    }
}
