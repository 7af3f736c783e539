use kernel::interface::query::OfferQuery;
use kernel::interface::update::OfferModifier;
use kernel::prelude::entity::{Offer, OfferId, OrderId, PartnerId};
use kernel::KernelError;

use crate::database::InMemoryTransaction;

pub struct InMemoryOfferRepository;

#[async_trait::async_trait]
impl OfferQuery for InMemoryOfferRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &OfferId,
    ) -> error_stack::Result<Option<Offer>, KernelError> {
        con.offer(id)
    }

    async fn find_by_order_id(
        &self,
        con: &mut InMemoryTransaction,
        order_id: &OrderId,
    ) -> error_stack::Result<Vec<Offer>, KernelError> {
        con.offers_where(|offer| offer.order_id() == order_id)
    }

    async fn find_by_partner_id(
        &self,
        con: &mut InMemoryTransaction,
        partner_id: &PartnerId,
    ) -> error_stack::Result<Vec<Offer>, KernelError> {
        let mut offers = con.offers_where(|offer| offer.partner_id() == partner_id)?;
        offers.reverse();
        Ok(offers)
    }
}

#[async_trait::async_trait]
impl OfferModifier for InMemoryOfferRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        offer: &Offer,
    ) -> error_stack::Result<(), KernelError> {
        con.stage_offer(offer.id().clone(), Some(offer.clone()), false)
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        offer: &Offer,
    ) -> error_stack::Result<(), KernelError> {
        con.stage_offer(offer.id().clone(), Some(offer.clone()), true)
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        offer_id: &OfferId,
    ) -> error_stack::Result<(), KernelError> {
        con.stage_offer(offer_id.clone(), None, true)
    }
}

#[cfg(test)]
mod test {
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::OfferQuery;
    use kernel::interface::update::OfferModifier;
    use kernel::prelude::entity::{
        CreatedAt, Offer, OfferId, OfferStatus, OrderId, PartnerId, Price, RespondedAt, ShipId,
    };
    use kernel::KernelError;

    use crate::database::{InMemoryDatabase, InMemoryOfferRepository};

    fn offer(order_id: &OrderId, partner_id: &PartnerId, created_at: OffsetDateTime) -> Offer {
        Offer::new(
            OfferId::new(Uuid::new_v4()),
            order_id.clone(),
            partner_id.clone(),
            ShipId::new(Uuid::new_v4()),
            Price::new(1200),
            OfferStatus::Pending,
            CreatedAt::new(created_at),
            None,
        )
    }

    #[tokio::test]
    async fn order_offers_keep_submission_order() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let order_id = OrderId::new(Uuid::new_v4());
        let partner_id = PartnerId::new(Uuid::new_v4());
        let now = OffsetDateTime::now_utc();
        let first = offer(&order_id, &partner_id, now - Duration::minutes(5));
        let second = offer(&order_id, &PartnerId::new(Uuid::new_v4()), now);
        let third = offer(&OrderId::new(Uuid::new_v4()), &partner_id, now);

        let mut con = db.transact().await?;
        for offer in [&second, &first, &third] {
            InMemoryOfferRepository.create(&mut con, offer).await?;
        }
        con.commit().await?;

        let mut con = db.transact().await?;
        let by_order = InMemoryOfferRepository
            .find_by_order_id(&mut con, &order_id)
            .await?;
        assert_eq!(by_order, vec![first.clone(), second]);

        let by_partner = InMemoryOfferRepository
            .find_by_partner_id(&mut con, &partner_id)
            .await?;
        assert_eq!(by_partner, vec![third, first]);
        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete_apply_on_commit() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut offer = offer(
            &OrderId::new(Uuid::new_v4()),
            &PartnerId::new(Uuid::new_v4()),
            OffsetDateTime::now_utc(),
        );
        let mut con = db.transact().await?;
        InMemoryOfferRepository.create(&mut con, &offer).await?;
        con.commit().await?;

        offer.reject(RespondedAt::new(OffsetDateTime::now_utc()));
        let mut con = db.transact().await?;
        InMemoryOfferRepository.update(&mut con, &offer).await?;
        con.commit().await?;

        let mut con = db.transact().await?;
        let found = InMemoryOfferRepository.find_by_id(&mut con, offer.id()).await?;
        assert_eq!(found.map(|offer| *offer.status()), Some(OfferStatus::Rejected));

        InMemoryOfferRepository.delete(&mut con, offer.id()).await?;
        let gone = InMemoryOfferRepository.find_by_id(&mut con, offer.id()).await?;
        assert!(gone.is_none());
        con.commit().await?;

        let mut con = db.transact().await?;
        let gone = InMemoryOfferRepository.find_by_id(&mut con, offer.id()).await?;
        assert!(gone.is_none());
        Ok(())
    }
}
