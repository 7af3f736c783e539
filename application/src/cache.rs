use std::future::Future;

use kernel::interface::cache::{CacheKey, CachePrefix, CacheStore};
use kernel::prelude::entity::{Offer, RentOrder, UserId};
use kernel::KernelError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serves `key` from the cache, or runs `load` and stores its result.
///
/// The result is stored only when no invalidation happened while `load` ran, so a write
/// that lands in between is never shadowed by the older snapshot.
pub(crate) async fn read_through<C, T, F>(
    cache: &C,
    key: CacheKey,
    load: F,
) -> error_stack::Result<T, KernelError>
where
    C: CacheStore,
    T: Serialize + DeserializeOwned + Send + Sync,
    F: Future<Output = error_stack::Result<T, KernelError>> + Send,
{
    if let Some(hit) = lookup(cache, &key) {
        return Ok(hit);
    }
    let checkpoint = cache.checkpoint(&key);
    let value = load.await?;
    match cache.populate(checkpoint, &key, &value, key.ttl()) {
        Ok(true) => {}
        Ok(false) => tracing::debug!("Skipped stale snapshot for {key}"),
        Err(report) => tracing::warn!("Failed to cache {key}: {report:?}"),
    }
    Ok(value)
}

/// Like [`read_through`], but absent values are not cached.
pub(crate) async fn read_through_found<C, T, F>(
    cache: &C,
    key: CacheKey,
    load: F,
) -> error_stack::Result<Option<T>, KernelError>
where
    C: CacheStore,
    T: Serialize + DeserializeOwned + Send + Sync,
    F: Future<Output = error_stack::Result<Option<T>, KernelError>> + Send,
{
    if let Some(hit) = lookup(cache, &key) {
        return Ok(Some(hit));
    }
    let checkpoint = cache.checkpoint(&key);
    let Some(value) = load.await? else {
        return Ok(None);
    };
    if let Err(report) = cache.populate(checkpoint, &key, &value, key.ttl()) {
        tracing::warn!("Failed to cache {key}: {report:?}");
    }
    Ok(Some(value))
}

fn lookup<C: CacheStore, T: DeserializeOwned>(cache: &C, key: &CacheKey) -> Option<T> {
    match cache.get(key) {
        Ok(Some(value)) => {
            tracing::debug!("Cache hit {key}");
            Some(value)
        }
        Ok(None) => {
            tracing::debug!("Cache miss {key}");
            None
        }
        Err(report) => {
            tracing::warn!("Cache read failed for {key}: {report:?}");
            None
        }
    }
}

/// Keys and prefixes to drop after a committed write.
#[derive(Debug, Default)]
pub(crate) struct Invalidation {
    keys: Vec<CacheKey>,
    prefixes: Vec<CachePrefix>,
}

impl Invalidation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: CacheKey) -> Self {
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
        self
    }

    pub fn prefix(mut self, prefix: CachePrefix) -> Self {
        if !self.prefixes.contains(&prefix) {
            self.prefixes.push(prefix);
        }
        self
    }

    /// Views of the order other than the renter's own listings.
    pub fn order(self, order: &RentOrder) -> Self {
        let this = self
            .key(CacheKey::order_by_id(order.id()))
            .key(CacheKey::offers_by_order(order.id()))
            .prefix(CachePrefix::available_orders())
            .prefix(CachePrefix::order_pages());
        match order.agreement() {
            Some(agreement) => this.prefix(CachePrefix::partner_orders(agreement.partner_id())),
            None => this,
        }
    }

    /// Active order and by-status listings of the renter.
    pub fn renter(self, user_id: &UserId) -> Self {
        self.prefix(CachePrefix::user_orders(user_id))
    }

    /// By-status listings of the renter only.
    pub fn renter_listings(self, user_id: &UserId) -> Self {
        self.prefix(CachePrefix::user_orders_by_status(user_id))
    }

    pub fn offer(self, offer: &Offer) -> Self {
        self.key(CacheKey::offer_by_id(offer.id()))
            .key(CacheKey::offers_by_order(offer.order_id()))
            .key(CacheKey::offers_by_partner(offer.partner_id()))
            .key(CacheKey::available_orders_for_partner(offer.partner_id()))
            .prefix(CachePrefix::partner_orders(offer.partner_id()))
    }

    pub fn apply<C: CacheStore>(self, cache: &C) {
        for key in &self.keys {
            if let Err(report) = cache.remove(key) {
                tracing::warn!("Failed to invalidate {key}: {report:?}");
            }
        }
        let mut removed = 0;
        for prefix in &self.prefixes {
            match cache.remove_by_prefix(prefix) {
                Ok(count) => removed += count,
                Err(report) => tracing::warn!("Failed to invalidate {prefix}: {report:?}"),
            }
        }
        tracing::debug!(
            "Invalidated {} keys and {removed} entries under {} prefixes",
            self.keys.len(),
            self.prefixes.len()
        );
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use kernel::interface::cache::{CacheKey, CachePrefix};
    use kernel::prelude::entity::UserId;

    use crate::cache::Invalidation;

    #[test]
    fn duplicates_are_collapsed() {
        let user_id = UserId::new(Uuid::new_v4());
        let invalidation = Invalidation::new()
            .renter(&user_id)
            .renter(&user_id)
            .key(CacheKey::active_order_for_user(&user_id))
            .key(CacheKey::active_order_for_user(&user_id))
            .prefix(CachePrefix::order_pages());
        assert_eq!(invalidation.keys.len(), 1);
        assert_eq!(invalidation.prefixes.len(), 2);
    }
}
