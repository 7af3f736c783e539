use std::ops::Deref;
use std::sync::Arc;

use application::lock::{DependOnOrderLocks, OrderLocks};
use driver::cache::{load_cache_config, MemoryCache};
use driver::database::{
    PostgresAccountRepository, PostgresDatabase, PostgresOfferRepository,
    PostgresOrderRepository, PostgresShipRepository,
};
use kernel::interface::cache::DependOnCacheStore;
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::query::{
    DependOnOfferQuery, DependOnOrderQuery, DependOnPartnerQuery, DependOnShipQuery,
    DependOnUserQuery,
};
use kernel::interface::update::{DependOnOfferModifier, DependOnOrderModifier};
use kernel::KernelError;
use vodca::References;

#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init().await?)))
    }

    pub fn handler(&self) -> &Handler {
        &self.0
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

#[derive(References)]
pub struct Handler {
    pgpool: PostgresDatabase,
    cache: MemoryCache,
    locks: OrderLocks,
}

impl Handler {
    pub async fn init() -> error_stack::Result<Self, KernelError> {
        let pgpool = PostgresDatabase::new().await?;
        let cache = MemoryCache::new(load_cache_config()?);
        tracing::info!(
            "Cache ready: {} entries max, compression level {}",
            cache.config().max_entries(),
            cache.config().compression_level()
        );

        Ok(Self {
            pgpool,
            cache,
            locks: OrderLocks::new(),
        })
    }
}

impl DependOnDatabaseConnection for Handler {
    type DatabaseConnection = PostgresDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.pgpool
    }
}

impl DependOnOrderQuery for Handler {
    type OrderQuery = PostgresOrderRepository;
    fn order_query(&self) -> &Self::OrderQuery {
        &PostgresOrderRepository
    }
}

impl DependOnOrderModifier for Handler {
    type OrderModifier = PostgresOrderRepository;
    fn order_modifier(&self) -> &Self::OrderModifier {
        &PostgresOrderRepository
    }
}

impl DependOnOfferQuery for Handler {
    type OfferQuery = PostgresOfferRepository;
    fn offer_query(&self) -> &Self::OfferQuery {
        &PostgresOfferRepository
    }
}

impl DependOnOfferModifier for Handler {
    type OfferModifier = PostgresOfferRepository;
    fn offer_modifier(&self) -> &Self::OfferModifier {
        &PostgresOfferRepository
    }
}

impl DependOnShipQuery for Handler {
    type ShipQuery = PostgresShipRepository;
    fn ship_query(&self) -> &Self::ShipQuery {
        &PostgresShipRepository
    }
}

impl DependOnUserQuery for Handler {
    type UserQuery = PostgresAccountRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &PostgresAccountRepository
    }
}

impl DependOnPartnerQuery for Handler {
    type PartnerQuery = PostgresAccountRepository;
    fn partner_query(&self) -> &Self::PartnerQuery {
        &PostgresAccountRepository
    }
}

impl DependOnCacheStore for Handler {
    type CacheStore = MemoryCache;
    fn cache_store(&self) -> &Self::CacheStore {
        &self.cache
    }
}

impl DependOnOrderLocks for Handler {
    fn order_locks(&self) -> &OrderLocks {
        &self.locks
    }
}
