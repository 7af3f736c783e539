use std::sync::Arc;

use dashmap::DashMap;
use kernel::prelude::entity::OrderId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-order async mutexes serializing every multi-step transition on one order.
///
/// Entries are created on first use and dropped again once nobody holds or waits for them.
#[derive(Default)]
pub struct OrderLocks {
    locks: DashMap<OrderId, Arc<Mutex<()>>>,
}

impl OrderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, order_id: &OrderId) -> OrderGuard<'_> {
        let lock = Arc::clone(self.locks.entry(order_id.clone()).or_default().value());
        let guard = match Arc::clone(&lock).try_lock_owned() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::debug!("Waiting for lock on order {}", order_id.as_ref());
                Arc::clone(&lock).lock_owned().await
            }
        };
        OrderGuard {
            locks: self,
            order_id: order_id.clone(),
            lock: Some(lock),
            guard: Some(guard),
        }
    }

    /// Number of orders that currently have a lock entry.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

pub struct OrderGuard<'a> {
    locks: &'a OrderLocks,
    order_id: OrderId,
    lock: Option<Arc<Mutex<()>>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for OrderGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let Some(lock) = self.lock.take() else {
            return;
        };
        let released = Arc::as_ptr(&lock);
        drop(lock);
        // Only the map is left holding the mutex once nobody else holds or waits for it.
        self.locks.locks.remove_if(&self.order_id, |_, entry| {
            Arc::as_ptr(entry) == released && Arc::strong_count(entry) == 1
        });
    }
}

pub trait DependOnOrderLocks: 'static + Sync + Send {
    fn order_locks(&self) -> &OrderLocks;
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use kernel::prelude::entity::OrderId;
    use uuid::Uuid;

    use crate::lock::OrderLocks;

    #[tokio::test]
    async fn entry_is_reclaimed_after_release() {
        let locks = OrderLocks::new();
        let order_id = OrderId::new(Uuid::new_v4());
        {
            let _guard = locks.acquire(&order_id).await;
            assert_eq!(locks.len(), 1);
        }
        assert!(locks.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn same_order_is_serialized() {
        let locks = Arc::new(OrderLocks::new());
        let order_id = OrderId::new(Uuid::new_v4());
        let inside = Arc::new(AtomicUsize::new(0));
        let overlap = Arc::new(AtomicUsize::new(0));

        let tasks = (0..16)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let order_id = order_id.clone();
                let inside = Arc::clone(&inside);
                let overlap = Arc::clone(&overlap);
                tokio::spawn(async move {
                    let _guard = locks.acquire(&order_id).await;
                    if inside.fetch_add(1, Ordering::SeqCst) > 0 {
                        overlap.fetch_add(1, Ordering::SeqCst);
                    }
                    tokio::time::sleep(Duration::from_millis(2)).await;
                    inside.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect::<Vec<_>>();
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(overlap.load(Ordering::SeqCst), 0);
        assert!(locks.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn contended_entry_is_reclaimed_by_last_holder() {
        let locks = Arc::new(OrderLocks::new());
        for _ in 0..200 {
            let order_id = OrderId::new(Uuid::new_v4());
            let first = locks.acquire(&order_id).await;
            let waiter = {
                let locks = Arc::clone(&locks);
                let order_id = order_id.clone();
                tokio::spawn(async move {
                    let _guard = locks.acquire(&order_id).await;
                })
            };
            tokio::task::yield_now().await;
            drop(first);
            waiter.await.unwrap();
            assert!(locks.is_empty());
        }
    }

    #[tokio::test]
    async fn different_orders_do_not_block() {
        let locks = OrderLocks::new();
        let first = locks.acquire(&OrderId::new(Uuid::new_v4())).await;
        let second = tokio::time::timeout(
            Duration::from_millis(50),
            locks.acquire(&OrderId::new(Uuid::new_v4())),
        )
        .await;
        assert!(second.is_ok());
        assert_eq!(locks.len(), 2);
        drop(first);
    }
}
