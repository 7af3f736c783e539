use error_stack::Report;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::cache::{CacheKey, DependOnCacheStore};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnOfferQuery, DependOnOrderQuery, DependOnPartnerQuery, DependOnShipQuery, OfferQuery,
    OrderQuery, PartnerQuery, ShipQuery,
};
use kernel::interface::update::{
    DependOnOfferModifier, DependOnOrderModifier, OfferModifier, OrderModifier,
};
use kernel::prelude::entity::{
    check_eligibility, Agreement, CreatedAt, Offer, OfferId, OfferStatus, OrderDate, OrderId,
    OrderStatus, PartnerId, Price, RentOrder, RespondedAt, ShipId,
};
use kernel::{KernelError, StatusMismatch};

use crate::cache::{read_through, read_through_found, Invalidation};
use crate::lock::DependOnOrderLocks;
use crate::transfer::{
    AcceptOfferDto, CreateOfferDto, DeleteOfferDto, GetOfferDto, GetOffersByOrderDto,
    GetOffersByPartnerDto, OfferDto, RejectOfferDto,
};

fn order_not_found(order_id: &OrderId) -> Report<KernelError> {
    Report::new(KernelError::NotFound)
        .attach_printable(format!("Order {} does not exist", order_id.as_ref()))
}

fn offer_not_found(offer_id: &OfferId) -> Report<KernelError> {
    Report::new(KernelError::NotFound)
        .attach_printable(format!("Offer {} does not exist", offer_id.as_ref()))
}

fn already_resolved(offer: &Offer) -> Report<KernelError> {
    Report::new(KernelError::Conflict).attach_printable(format!(
        "Offer {} is already {}",
        offer.id().as_ref(),
        offer.status()
    ))
}

#[async_trait::async_trait]
pub trait CreateOfferService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnOrderQuery
    + DependOnOrderModifier
    + DependOnOfferQuery
    + DependOnOfferModifier
    + DependOnShipQuery
    + DependOnPartnerQuery
    + DependOnCacheStore
    + DependOnOrderLocks
{
    #[tracing::instrument(skip(self))]
    async fn create_offer(&self, dto: CreateOfferDto) -> error_stack::Result<OfferDto, KernelError> {
        let price = Price::new(dto.price);
        if !price.is_positive() {
            return Err(Report::new(KernelError::InvalidInput)
                .attach_printable(format!("Price must be positive, got {}", dto.price)));
        }
        let order_id = OrderId::new(dto.order_id);
        let partner_id = PartnerId::new(dto.partner_id);
        let ship_id = ShipId::new(dto.ship_id);

        let _guard = self.order_locks().acquire(&order_id).await;
        let mut connection = self.database_connection().transact().await?;

        let mut order = self
            .order_query()
            .find_by_id(&mut connection, &order_id)
            .await?
            .ok_or_else(|| order_not_found(&order_id))?;
        if !order.status().accepts_offers() {
            return Err(Report::new(KernelError::InvalidOrderStatus).attach_printable(
                StatusMismatch::new(*order.status(), OrderStatus::ACCEPTING_OFFERS),
            ));
        }
        if !self
            .partner_query()
            .exists(&mut connection, &partner_id)
            .await?
        {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Partner {} does not exist", partner_id.as_ref())));
        }
        let ship = self
            .ship_query()
            .find_by_id(&mut connection, &ship_id)
            .await?
            .filter(|ship| ship.is_owned_by(&partner_id))
            .ok_or_else(|| {
                Report::new(KernelError::NotFound).attach_printable(format!(
                    "Ship {} does not exist or is not owned by partner {}",
                    ship_id.as_ref(),
                    partner_id.as_ref()
                ))
            })?;
        check_eligibility(&ship, &order).map_err(|unmet| {
            Report::new(KernelError::ShipRequirementsNotMet).attach_printable(unmet)
        })?;

        let offers = self
            .offer_query()
            .find_by_order_id(&mut connection, &order_id)
            .await?;
        if offers
            .iter()
            .any(|offer| offer.partner_id() == &partner_id && offer.is_pending())
        {
            return Err(Report::new(KernelError::DuplicateOffer).attach_printable(format!(
                "Partner {} already has a pending offer on order {}",
                partner_id.as_ref(),
                order_id.as_ref()
            )));
        }

        let offer = Offer::new(
            OfferId::new(Uuid::new_v4()),
            order_id,
            partner_id,
            ship_id,
            price,
            OfferStatus::Pending,
            CreatedAt::now(),
            None,
        );
        self.offer_modifier()
            .create(&mut connection, &offer)
            .await?;
        let flipped = order.receive_offer();
        if flipped {
            self.order_modifier()
                .update(&mut connection, &order)
                .await?;
        }
        connection.commit().await?;
        tracing::info!(
            "Offer {} created on order {}",
            offer.id().as_ref(),
            offer.order_id().as_ref()
        );

        let invalidation = Invalidation::new().offer(&offer);
        let invalidation = if flipped {
            invalidation.order(&order).renter(order.user_id())
        } else {
            invalidation
        };
        invalidation.apply(self.cache_store());

        Ok(OfferDto::from(offer))
    }
}

impl<T> CreateOfferService for T where
    T: DependOnDatabaseConnection
        + DependOnOrderQuery
        + DependOnOrderModifier
        + DependOnOfferQuery
        + DependOnOfferModifier
        + DependOnShipQuery
        + DependOnPartnerQuery
        + DependOnCacheStore
        + DependOnOrderLocks
{
}

#[async_trait::async_trait]
pub trait AcceptOfferService:
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
    /// Accepts one offer and rejects every other pending offer of the order in the same unit.
    #[tracing::instrument(skip(self))]
    async fn accept_offer(&self, dto: AcceptOfferDto) -> error_stack::Result<(), KernelError> {
        let order_id = OrderId::new(dto.order_id);
        let offer_id = OfferId::new(dto.offer_id);

        let _guard = self.order_locks().acquire(&order_id).await;
        let mut connection = self.database_connection().transact().await?;

        let mut order = self
            .order_query()
            .find_by_id(&mut connection, &order_id)
            .await?
            .ok_or_else(|| order_not_found(&order_id))?;
        let mut accepted = self
            .offer_query()
            .find_by_id(&mut connection, &offer_id)
            .await?
            .filter(|offer| offer.order_id() == &order_id)
            .ok_or_else(|| offer_not_found(&offer_id))?;
        if !accepted.is_pending() {
            return Err(already_resolved(&accepted));
        }
        if order.status() != &OrderStatus::HasOffers {
            return Err(Report::new(KernelError::InvalidOrderStatus).attach_printable(
                StatusMismatch::new(*order.status(), [OrderStatus::HasOffers]),
            ));
        }

        let now = OffsetDateTime::now_utc();
        let responded_at = RespondedAt::new(now);
        order.agree(Agreement::new(
            accepted.partner_id().clone(),
            accepted.ship_id().clone(),
            *accepted.price(),
            OrderDate::new(now),
        ));
        self.order_modifier()
            .update(&mut connection, &order)
            .await?;
        accepted.accept(responded_at);
        self.offer_modifier()
            .update(&mut connection, &accepted)
            .await?;

        let mut rejected = Vec::new();
        for mut offer in self
            .offer_query()
            .find_by_order_id(&mut connection, &order_id)
            .await?
        {
            if offer.id() == accepted.id() || !offer.is_pending() {
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
            "Order {} agreed on offer {}, {} other offers rejected",
            order_id.as_ref(),
            offer_id.as_ref(),
            rejected.len()
        );

        rejected
            .iter()
            .fold(
                Invalidation::new()
                    .order(&order)
                    .renter(order.user_id())
                    .offer(&accepted),
                Invalidation::offer,
            )
            .apply(self.cache_store());
        Ok(())
    }
}

impl<T> AcceptOfferService for T where
    T: DependOnDatabaseConnection
        + DependOnOrderQuery
        + DependOnOrderModifier
        + DependOnOfferQuery
        + DependOnOfferModifier
        + DependOnCacheStore
        + DependOnOrderLocks
{
}

#[async_trait::async_trait]
pub trait RejectOfferService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnOrderQuery
    + DependOnOfferQuery
    + DependOnOfferModifier
    + DependOnCacheStore
    + DependOnOrderLocks
{
    #[tracing::instrument(skip(self))]
    async fn reject_offer(&self, dto: RejectOfferDto) -> error_stack::Result<(), KernelError> {
        let offer_id = OfferId::new(dto.offer_id);
        let order_id = offer_order(self, &offer_id).await?;

        let _guard = self.order_locks().acquire(&order_id).await;
        let mut connection = self.database_connection().transact().await?;

        let mut offer = self
            .offer_query()
            .find_by_id(&mut connection, &offer_id)
            .await?
            .ok_or_else(|| offer_not_found(&offer_id))?;
        if !offer.is_pending() {
            return Err(already_resolved(&offer));
        }
        offer.reject(RespondedAt::new(OffsetDateTime::now_utc()));
        self.offer_modifier()
            .update(&mut connection, &offer)
            .await?;
        let order = self
            .order_query()
            .find_by_id(&mut connection, &order_id)
            .await?;
        connection.commit().await?;
        tracing::info!("Offer {} rejected", offer_id.as_ref());

        resolved_offer_footprint(&offer, order.as_ref()).apply(self.cache_store());
        Ok(())
    }
}

impl<T> RejectOfferService for T where
    T: DependOnDatabaseConnection
        + DependOnOrderQuery
        + DependOnOfferQuery
        + DependOnOfferModifier
        + DependOnCacheStore
        + DependOnOrderLocks
{
}

#[async_trait::async_trait]
pub trait DeleteOfferService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnOrderQuery
    + DependOnOfferQuery
    + DependOnOfferModifier
    + DependOnCacheStore
    + DependOnOrderLocks
{
    /// Withdraws a pending offer. The order keeps its status.
    #[tracing::instrument(skip(self))]
    async fn delete_offer(&self, dto: DeleteOfferDto) -> error_stack::Result<(), KernelError> {
        let offer_id = OfferId::new(dto.offer_id);
        let order_id = offer_order(self, &offer_id).await?;

        let _guard = self.order_locks().acquire(&order_id).await;
        let mut connection = self.database_connection().transact().await?;

        let offer = self
            .offer_query()
            .find_by_id(&mut connection, &offer_id)
            .await?
            .ok_or_else(|| offer_not_found(&offer_id))?;
        if !offer.is_pending() {
            return Err(already_resolved(&offer));
        }
        self.offer_modifier()
            .delete(&mut connection, &offer_id)
            .await?;
        let order = self
            .order_query()
            .find_by_id(&mut connection, &order_id)
            .await?;
        connection.commit().await?;
        tracing::info!("Offer {} withdrawn", offer_id.as_ref());

        resolved_offer_footprint(&offer, order.as_ref()).apply(self.cache_store());
        Ok(())
    }
}

impl<T> DeleteOfferService for T where
    T: DependOnDatabaseConnection
        + DependOnOrderQuery
        + DependOnOfferQuery
        + DependOnOfferModifier
        + DependOnCacheStore
        + DependOnOrderLocks
{
}

/// Looks up which order an offer belongs to, before the order lock is taken.
async fn offer_order<T>(module: &T, offer_id: &OfferId) -> error_stack::Result<OrderId, KernelError>
where
    T: ?Sized + DependOnDatabaseConnection + DependOnOfferQuery,
{
    let mut connection = module.database_connection().transact().await?;
    let offer = module
        .offer_query()
        .find_by_id(&mut connection, offer_id)
        .await?
        .ok_or_else(|| offer_not_found(offer_id))?;
    Ok(offer.order_id().clone())
}

fn resolved_offer_footprint(
    offer: &Offer,
    order: Option<&RentOrder>,
) -> Invalidation {
    let invalidation = Invalidation::new().offer(offer);
    match order {
        Some(order) => invalidation
            .order(order)
            .renter_listings(order.user_id()),
        None => invalidation,
    }
}

#[async_trait::async_trait]
pub trait GetOfferService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnOfferQuery + DependOnCacheStore
{
    async fn get_offer(&self, dto: GetOfferDto) -> error_stack::Result<Option<OfferDto>, KernelError> {
        let offer_id = OfferId::new(dto.offer_id);
        read_through_found(self.cache_store(), CacheKey::offer_by_id(&offer_id), async {
            let mut connection = self.database_connection().transact().await?;
            let offer = self
                .offer_query()
                .find_by_id(&mut connection, &offer_id)
                .await?;
            Ok::<_, Report<KernelError>>(offer.map(OfferDto::from))
        })
        .await
    }

    /// Offers of one order, oldest first.
    async fn get_offers_by_order(
        &self,
        dto: GetOffersByOrderDto,
    ) -> error_stack::Result<Vec<OfferDto>, KernelError> {
        let order_id = OrderId::new(dto.order_id);
        read_through(self.cache_store(), CacheKey::offers_by_order(&order_id), async {
            let mut connection = self.database_connection().transact().await?;
            let offers = self
                .offer_query()
                .find_by_order_id(&mut connection, &order_id)
                .await?;
            let offers = offers.into_iter().map(OfferDto::from).collect::<Vec<_>>();
            Ok::<_, Report<KernelError>>(offers)
        })
        .await
    }

    /// Offers submitted by one partner, newest first.
    async fn get_offers_by_partner(
        &self,
        dto: GetOffersByPartnerDto,
    ) -> error_stack::Result<Vec<OfferDto>, KernelError> {
        let partner_id = PartnerId::new(dto.partner_id);
        read_through(
            self.cache_store(),
            CacheKey::offers_by_partner(&partner_id),
            async {
                let mut connection = self.database_connection().transact().await?;
                let offers = self
                    .offer_query()
                    .find_by_partner_id(&mut connection, &partner_id)
                    .await?;
                let offers = offers.into_iter().map(OfferDto::from).collect::<Vec<_>>();
                Ok::<_, Report<KernelError>>(offers)
            },
        )
        .await
    }
}

impl<T> GetOfferService for T where
    T: DependOnDatabaseConnection + DependOnOfferQuery + DependOnCacheStore
{
}
