use error_stack::Report;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::cache::{CacheKey, DependOnCacheStore};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnOfferQuery, DependOnOrderQuery, DependOnShipQuery, DependOnUserQuery, OfferQuery,
    OrderQuery, ShipQuery, UserQuery,
};
use kernel::interface::update::{
    DependOnOfferModifier, DependOnOrderModifier, OfferModifier, OrderModifier,
};
use kernel::prelude::entity::{
    check_eligibility, CreatedAt, OrderId, OrderStatus, PartnerId, PassengerCount, PortId,
    RentOrder, RentalPeriod, RespondedAt, SelectLimit, SelectOffset, ShipTypeId, UserId,
};
use kernel::{KernelError, StatusMismatch};

use crate::cache::{read_through, read_through_found, Invalidation};
use crate::lock::DependOnOrderLocks;
use crate::transfer::{
    CancelOrderDto, CompleteOrderDto, CreateOrderDto, GetActiveOrderDto, GetAvailableOrdersDto,
    GetOrderDto, GetOrdersByPartnerDto, GetOrdersByUserDto, GetOrdersPageDto, OrderDto,
};

#[async_trait::async_trait]
pub trait CreateOrderService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnUserQuery
    + DependOnOrderModifier
    + DependOnCacheStore
{
    #[tracing::instrument(skip(self))]
    async fn create_order(&self, dto: CreateOrderDto) -> error_stack::Result<OrderDto, KernelError> {
        if dto.passenger_count <= 0 {
            return Err(Report::new(KernelError::InvalidInput).attach_printable(format!(
                "Passenger count must be positive, got {}",
                dto.passenger_count
            )));
        }
        let period = RentalPeriod::new(dto.start_at, dto.end_at);
        if !period.is_valid() {
            return Err(Report::new(KernelError::InvalidInput)
                .attach_printable("Rental period must start before it ends"));
        }
        let user_id = UserId::new(dto.user_id);

        let mut connection = self.database_connection().transact().await?;
        if !self.user_query().exists(&mut connection, &user_id).await? {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("User {} does not exist", user_id.as_ref())));
        }
        let order = RentOrder::new(
            OrderId::new(Uuid::new_v4()),
            user_id,
            ShipTypeId::new(dto.ship_type_id),
            PortId::new(dto.departure_port_id),
            dto.arrival_port_id.map(PortId::new),
            PassengerCount::new(dto.passenger_count),
            period,
            OrderStatus::AwaitingResponse,
            None,
            CreatedAt::now(),
        );
        self.order_modifier()
            .create(&mut connection, &order)
            .await?;
        connection.commit().await?;
        tracing::info!("Order {} created", order.id().as_ref());

        Invalidation::new()
            .order(&order)
            .renter(order.user_id())
            .apply(self.cache_store());
        Ok(OrderDto::from(order))
    }
}

impl<T> CreateOrderService for T where
    T: DependOnDatabaseConnection + DependOnUserQuery + DependOnOrderModifier + DependOnCacheStore
{
}

#[async_trait::async_trait]
pub trait GetOrderService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnOrderQuery
    + DependOnShipQuery
    + DependOnCacheStore
{
    async fn get_order(&self, dto: GetOrderDto) -> error_stack::Result<Option<OrderDto>, KernelError> {
        let order_id = OrderId::new(dto.order_id);
        read_through_found(self.cache_store(), CacheKey::order_by_id(&order_id), async {
            let mut connection = self.database_connection().transact().await?;
            let order = self
                .order_query()
                .find_by_id(&mut connection, &order_id)
                .await?;
            Ok::<_, Report<KernelError>>(order.map(OrderDto::from))
        })
        .await
    }

    /// Newest order of the renter that is neither completed nor cancelled.
    async fn get_active_order(
        &self,
        dto: GetActiveOrderDto,
    ) -> error_stack::Result<Option<OrderDto>, KernelError> {
        let user_id = UserId::new(dto.user_id);
        read_through(
            self.cache_store(),
            CacheKey::active_order_for_user(&user_id),
            async {
                let mut connection = self.database_connection().transact().await?;
                let orders = self
                    .order_query()
                    .find_by_user_id(&mut connection, &user_id)
                    .await?;
                let active = orders.into_iter().find(RentOrder::is_active);
                Ok::<_, Report<KernelError>>(active.map(OrderDto::from))
            },
        )
        .await
    }

    async fn get_orders_by_user(
        &self,
        dto: GetOrdersByUserDto,
    ) -> error_stack::Result<Vec<OrderDto>, KernelError> {
        let user_id = UserId::new(dto.user_id);
        let status = dto.status;
        read_through(
            self.cache_store(),
            CacheKey::orders_by_user(&user_id, &status),
            async {
                let mut connection = self.database_connection().transact().await?;
                let orders = self
                    .order_query()
                    .find_by_user_id(&mut connection, &user_id)
                    .await?;
                Ok::<_, Report<KernelError>>(with_status(orders, status))
            },
        )
        .await
    }

    /// Orders agreed with the partner.
    async fn get_orders_by_partner(
        &self,
        dto: GetOrdersByPartnerDto,
    ) -> error_stack::Result<Vec<OrderDto>, KernelError> {
        let partner_id = PartnerId::new(dto.partner_id);
        let status = dto.status;
        read_through(
            self.cache_store(),
            CacheKey::orders_by_partner(&partner_id, &status),
            async {
                let mut connection = self.database_connection().transact().await?;
                let orders = self
                    .order_query()
                    .find_by_partner_id(&mut connection, &partner_id)
                    .await?;
                Ok::<_, Report<KernelError>>(with_status(orders, status))
            },
        )
        .await
    }

    /// Orders still taking offers that at least one of the partner's ships can serve.
    async fn get_available_orders(
        &self,
        dto: GetAvailableOrdersDto,
    ) -> error_stack::Result<Vec<OrderDto>, KernelError> {
        let partner_id = PartnerId::new(dto.partner_id);
        read_through(
            self.cache_store(),
            CacheKey::available_orders_for_partner(&partner_id),
            async {
                let mut connection = self.database_connection().transact().await?;
                let ships = self
                    .ship_query()
                    .find_by_partner_id(&mut connection, &partner_id)
                    .await?;
                let orders = self
                    .order_query()
                    .find_by_statuses(&mut connection, &OrderStatus::ACCEPTING_OFFERS)
                    .await?;
                let available = orders
                    .into_iter()
                    .filter(|order| {
                        ships
                            .iter()
                            .any(|ship| check_eligibility(ship, order).is_ok())
                    })
                    .map(OrderDto::from)
                    .collect::<Vec<_>>();
                Ok::<_, Report<KernelError>>(available)
            },
        )
        .await
    }

    async fn get_orders(
        &self,
        dto: GetOrdersPageDto,
    ) -> error_stack::Result<Vec<OrderDto>, KernelError> {
        let limit = dto.limit.map(SelectLimit::new).unwrap_or_default();
        let offset = dto.offset.map(SelectOffset::new).unwrap_or_default();
        if *limit.as_ref() <= 0 || *offset.as_ref() < 0 {
            return Err(Report::new(KernelError::InvalidInput).attach_printable(format!(
                "Invalid page: limit {}, offset {}",
                limit.as_ref(),
                offset.as_ref()
            )));
        }
        read_through(
            self.cache_store(),
            CacheKey::order_page(&limit, &offset),
            async {
                let mut connection = self.database_connection().transact().await?;
                let orders = self
                    .order_query()
                    .find_all(&mut connection, &limit, &offset)
                    .await?;
                let orders = orders.into_iter().map(OrderDto::from).collect::<Vec<_>>();
                Ok::<_, Report<KernelError>>(orders)
            },
        )
        .await
    }
}

impl<T> GetOrderService for T where
    T: DependOnDatabaseConnection + DependOnOrderQuery + DependOnShipQuery + DependOnCacheStore
{
}

fn with_status(orders: Vec<RentOrder>, status: OrderStatus) -> Vec<OrderDto> {
    orders
        .into_iter()
        .filter(|order| order.status() == &status)
        .map(OrderDto::from)
        .collect()
}

#[async_trait::async_trait]
pub trait CloseOrderService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnOrderQuery
    + DependOnOrderModifier
    + DependOnOfferQuery
    + DependOnOfferModifier
    + DependOnCacheStore
    + DependOnOrderLocks
{
    #[tracing::instrument(skip(self))]
    async fn complete_order(&self, dto: CompleteOrderDto) -> error_stack::Result<(), KernelError> {
        let order_id = OrderId::new(dto.order_id);
        let _guard = self.order_locks().acquire(&order_id).await;
        let mut connection = self.database_connection().transact().await?;

        let mut order = find_order(self, &mut connection, &order_id).await?;
        if order.status() != &OrderStatus::Agreed {
            return Err(Report::new(KernelError::InvalidOrderStatus)
                .attach_printable(StatusMismatch::new(*order.status(), [OrderStatus::Agreed])));
        }
        order.complete();
        self.order_modifier()
            .update(&mut connection, &order)
            .await?;
        connection.commit().await?;
        tracing::info!("Order {} completed", order_id.as_ref());

        Invalidation::new()
            .order(&order)
            .renter(order.user_id())
            .apply(self.cache_store());
        Ok(())
    }

    /// Cancels the order and rejects its pending offers in the same unit.
    #[tracing::instrument(skip(self))]
    async fn cancel_order(&self, dto: CancelOrderDto) -> error_stack::Result<(), KernelError> {
        const CANCELLABLE: [OrderStatus; 3] = [
            OrderStatus::AwaitingResponse,
            OrderStatus::HasOffers,
            OrderStatus::Agreed,
        ];
        let order_id = OrderId::new(dto.order_id);
        let _guard = self.order_locks().acquire(&order_id).await;
        let mut connection = self.database_connection().transact().await?;

        let mut order = find_order(self, &mut connection, &order_id).await?;
        if !CANCELLABLE.contains(order.status()) {
            return Err(Report::new(KernelError::InvalidOrderStatus)
                .attach_printable(StatusMismatch::new(*order.status(), CANCELLABLE)));
        }
        order.cancel();
        self.order_modifier()
            .update(&mut connection, &order)
            .await?;

        let responded_at = RespondedAt::new(OffsetDateTime::now_utc());
        let mut rejected = Vec::new();
        for mut offer in self
            .offer_query()
            .find_by_order_id(&mut connection, &order_id)
            .await?
        {
            if !offer.is_pending() {
                continue;
            }
            offer.reject(responded_at);
            self.offer_modifier()
                .update(&mut connection, &offer)
                .await?;
            rejected.push(offer);
        }
        connection.commit().await?;
        tracing::info!(
            "Order {} cancelled, {} pending offers rejected",
            order_id.as_ref(),
            rejected.len()
        );

        rejected
            .iter()
            .fold(
                Invalidation::new().order(&order).renter(order.user_id()),
                Invalidation::offer,
            )
            .apply(self.cache_store());
        Ok(())
    }
}

impl<T> CloseOrderService for T where
    T: DependOnDatabaseConnection
        + DependOnOrderQuery
        + DependOnOrderModifier
        + DependOnOfferQuery
        + DependOnOfferModifier
        + DependOnCacheStore
        + DependOnOrderLocks
{
}

async fn find_order<T>(
    module: &T,
    connection: &mut <T::DatabaseConnection as DatabaseConnection>::Transaction,
    order_id: &OrderId,
) -> error_stack::Result<RentOrder, KernelError>
where
    T: ?Sized + DependOnOrderQuery,
{
    module
        .order_query()
        .find_by_id(connection, order_id)
        .await?
        .ok_or_else(|| {
            Report::new(KernelError::NotFound)
                .attach_printable(format!("Order {} does not exist", order_id.as_ref()))
        })
}
