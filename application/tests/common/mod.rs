#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use application::lock::{DependOnOrderLocks, OrderLocks};
use application::service::{CreateOfferService, CreateOrderService};
use application::transfer::{CreateOfferDto, CreateOrderDto, OfferDto, OrderDto};
use driver::cache::MemoryCache;
use driver::database::{
    InMemoryAccountRepository, InMemoryDatabase, InMemoryOfferRepository,
    InMemoryOrderRepository, InMemoryShipRepository,
};
use error_stack::Report;
use kernel::interface::cache::{
    CacheCheckpoint, CacheConfig, CacheKey, CachePrefix, CacheStore, DependOnCacheStore,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::query::{
    DependOnOfferQuery, DependOnOrderQuery, DependOnPartnerQuery, DependOnShipQuery,
    DependOnUserQuery,
};
use kernel::interface::update::{DependOnOfferModifier, DependOnOrderModifier};
use kernel::prelude::entity::{PartnerId, PortId, Ship, ShipCapacity, ShipId, ShipTypeId, UserId};
use kernel::KernelError;

pub struct TestModule<C = MemoryCache> {
    database: InMemoryDatabase,
    cache: C,
    locks: OrderLocks,
}

impl TestModule {
    pub fn new() -> Arc<Self> {
        TestModule::with_cache(MemoryCache::new(CacheConfig::default()))
    }
}

impl<C: CacheStore> TestModule<C> {
    pub fn with_cache(cache: C) -> Arc<Self> {
        Arc::new(Self {
            database: InMemoryDatabase::new(),
            cache,
            locks: OrderLocks::new(),
        })
    }

    pub fn database(&self) -> &InMemoryDatabase {
        &self.database
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn locks(&self) -> &OrderLocks {
        &self.locks
    }
}

impl<C: CacheStore> DependOnDatabaseConnection for TestModule<C> {
    type DatabaseConnection = InMemoryDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.database
    }
}

impl<C: CacheStore> DependOnOrderQuery for TestModule<C> {
    type OrderQuery = InMemoryOrderRepository;
    fn order_query(&self) -> &Self::OrderQuery {
        &InMemoryOrderRepository
    }
}

impl<C: CacheStore> DependOnOrderModifier for TestModule<C> {
    type OrderModifier = InMemoryOrderRepository;
    fn order_modifier(&self) -> &Self::OrderModifier {
        &InMemoryOrderRepository
    }
}

impl<C: CacheStore> DependOnOfferQuery for TestModule<C> {
    type OfferQuery = InMemoryOfferRepository;
    fn offer_query(&self) -> &Self::OfferQuery {
        &InMemoryOfferRepository
    }
}

impl<C: CacheStore> DependOnOfferModifier for TestModule<C> {
    type OfferModifier = InMemoryOfferRepository;
    fn offer_modifier(&self) -> &Self::OfferModifier {
        &InMemoryOfferRepository
    }
}

impl<C: CacheStore> DependOnShipQuery for TestModule<C> {
    type ShipQuery = InMemoryShipRepository;
    fn ship_query(&self) -> &Self::ShipQuery {
        &InMemoryShipRepository
    }
}

impl<C: CacheStore> DependOnUserQuery for TestModule<C> {
    type UserQuery = InMemoryAccountRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &InMemoryAccountRepository
    }
}

impl<C: CacheStore> DependOnPartnerQuery for TestModule<C> {
    type PartnerQuery = InMemoryAccountRepository;
    fn partner_query(&self) -> &Self::PartnerQuery {
        &InMemoryAccountRepository
    }
}

impl<C: CacheStore> DependOnCacheStore for TestModule<C> {
    type CacheStore = C;
    fn cache_store(&self) -> &Self::CacheStore {
        &self.cache
    }
}

impl<C: CacheStore> DependOnOrderLocks for TestModule<C> {
    fn order_locks(&self) -> &OrderLocks {
        &self.locks
    }
}

/// A renter's request for a ship type leaving from one port.
pub struct Market {
    pub user_id: Uuid,
    pub ship_type_id: Uuid,
    pub port_id: Uuid,
}

impl Market {
    pub fn open<C: CacheStore>(module: &TestModule<C>) -> error_stack::Result<Self, KernelError> {
        let user_id = Uuid::new_v4();
        module.database().insert_user(UserId::new(user_id))?;
        Ok(Self {
            user_id,
            ship_type_id: Uuid::new_v4(),
            port_id: Uuid::new_v4(),
        })
    }

    pub async fn order<C: CacheStore>(
        &self,
        module: &TestModule<C>,
        passengers: i32,
    ) -> error_stack::Result<OrderDto, KernelError> {
        let start_at = OffsetDateTime::now_utc() + Duration::days(1);
        module
            .create_order(CreateOrderDto {
                user_id: self.user_id,
                ship_type_id: self.ship_type_id,
                departure_port_id: self.port_id,
                arrival_port_id: None,
                passenger_count: passengers,
                start_at,
                end_at: start_at + Duration::days(3),
            })
            .await
    }

    /// Registers a partner owning one ship that matches this market.
    pub fn partner<C: CacheStore>(
        &self,
        module: &TestModule<C>,
        capacity: i32,
    ) -> error_stack::Result<Partner, KernelError> {
        let partner_id = Uuid::new_v4();
        let ship_id = Uuid::new_v4();
        module.database().insert_partner(PartnerId::new(partner_id))?;
        module.database().insert_ship(Ship::new(
            ShipId::new(ship_id),
            PartnerId::new(partner_id),
            ShipTypeId::new(self.ship_type_id),
            PortId::new(self.port_id),
            ShipCapacity::new(capacity),
        ))?;
        Ok(Partner {
            partner_id,
            ship_id,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Partner {
    pub partner_id: Uuid,
    pub ship_id: Uuid,
}

impl Partner {
    pub async fn offer<C: CacheStore>(
        &self,
        module: &TestModule<C>,
        order_id: Uuid,
        price: i64,
    ) -> error_stack::Result<OfferDto, KernelError> {
        module
            .create_offer(CreateOfferDto {
                order_id,
                partner_id: self.partner_id,
                ship_id: self.ship_id,
                price,
            })
            .await
    }
}

pub fn kind<T: std::fmt::Debug>(result: error_stack::Result<T, KernelError>) -> KernelError {
    match result {
        Ok(value) => panic!("expected an error, got {value:?}"),
        Err(report) => *report.current_context(),
    }
}

/// A cache whose every operation fails. Counts the failed calls.
#[derive(Default)]
pub struct BrokenCache {
    failures: AtomicUsize,
}

impl BrokenCache {
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> error_stack::Result<T, KernelError> {
        self.failures.fetch_add(1, Ordering::SeqCst);
        Err(Report::new(KernelError::Internal).attach_printable("cache backend unavailable"))
    }
}

impl CacheStore for BrokenCache {
    fn get<T: DeserializeOwned>(
        &self,
        _: &CacheKey,
    ) -> error_stack::Result<Option<T>, KernelError> {
        self.fail()
    }

    fn set<T: Serialize + Sync>(
        &self,
        _: &CacheKey,
        _: &T,
        _: std::time::Duration,
    ) -> error_stack::Result<(), KernelError> {
        self.fail()
    }

    fn checkpoint(&self, _: &CacheKey) -> CacheCheckpoint {
        CacheCheckpoint::new(0)
    }

    fn populate<T: Serialize + Sync>(
        &self,
        _: CacheCheckpoint,
        _: &CacheKey,
        _: &T,
        _: std::time::Duration,
    ) -> error_stack::Result<bool, KernelError> {
        self.fail()
    }

    fn remove(&self, _: &CacheKey) -> error_stack::Result<(), KernelError> {
        self.fail()
    }

    fn remove_by_prefix(&self, _: &CachePrefix) -> error_stack::Result<usize, KernelError> {
        self.fail()
    }

    fn clear(&self) -> error_stack::Result<(), KernelError> {
        self.fail()
    }
}
