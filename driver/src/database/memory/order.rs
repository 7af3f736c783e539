use kernel::interface::query::OrderQuery;
use kernel::interface::update::OrderModifier;
use kernel::prelude::entity::{
    OrderId, OrderStatus, PartnerId, RentOrder, SelectLimit, SelectOffset, UserId,
};
use kernel::KernelError;

use crate::database::InMemoryTransaction;

pub struct InMemoryOrderRepository;

#[async_trait::async_trait]
impl OrderQuery for InMemoryOrderRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &OrderId,
    ) -> error_stack::Result<Option<RentOrder>, KernelError> {
        con.order(id)
    }

    async fn find_by_user_id(
        &self,
        con: &mut InMemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<RentOrder>, KernelError> {
        con.orders_where(|order| order.user_id() == user_id)
    }

    async fn find_by_partner_id(
        &self,
        con: &mut InMemoryTransaction,
        partner_id: &PartnerId,
    ) -> error_stack::Result<Vec<RentOrder>, KernelError> {
        con.orders_where(|order| {
            order
                .agreement()
                .as_ref()
                .is_some_and(|agreement| agreement.partner_id() == partner_id)
        })
    }

    async fn find_by_statuses(
        &self,
        con: &mut InMemoryTransaction,
        statuses: &[OrderStatus],
    ) -> error_stack::Result<Vec<RentOrder>, KernelError> {
        con.orders_where(|order| statuses.contains(order.status()))
    }

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<RentOrder>, KernelError> {
        let limit = usize::try_from(*limit.as_ref()).unwrap_or_default();
        let offset = usize::try_from(*offset.as_ref()).unwrap_or_default();
        Ok(con
            .orders_where(|_| true)?
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }
}

#[async_trait::async_trait]
impl OrderModifier for InMemoryOrderRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        order: &RentOrder,
    ) -> error_stack::Result<(), KernelError> {
        con.stage_order(order.id().clone(), Some(order.clone()), false)
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        order: &RentOrder,
    ) -> error_stack::Result<(), KernelError> {
        con.stage_order(order.id().clone(), Some(order.clone()), true)
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        order_id: &OrderId,
    ) -> error_stack::Result<(), KernelError> {
        con.stage_order(order_id.clone(), None, true)
    }
}

#[cfg(test)]
mod test {
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::OrderQuery;
    use kernel::interface::update::OrderModifier;
    use kernel::prelude::entity::{
        CreatedAt, OrderId, OrderStatus, PassengerCount, PortId, RentOrder, RentalPeriod,
        SelectLimit, SelectOffset, ShipTypeId, UserId,
    };
    use kernel::KernelError;

    use crate::database::{InMemoryDatabase, InMemoryOrderRepository};

    fn order(user_id: &UserId, created_at: OffsetDateTime) -> RentOrder {
        RentOrder::new(
            OrderId::new(Uuid::new_v4()),
            user_id.clone(),
            ShipTypeId::new(Uuid::new_v4()),
            PortId::new(Uuid::new_v4()),
            None,
            PassengerCount::new(2),
            RentalPeriod::new(created_at, created_at + Duration::days(1)),
            OrderStatus::AwaitingResponse,
            None,
            CreatedAt::new(created_at),
        )
    }

    #[tokio::test]
    async fn uncommitted_writes_stay_invisible() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let user_id = UserId::new(Uuid::new_v4());
        let order = order(&user_id, OffsetDateTime::now_utc());

        let mut writer = db.transact().await?;
        InMemoryOrderRepository.create(&mut writer, &order).await?;
        let staged = InMemoryOrderRepository
            .find_by_id(&mut writer, order.id())
            .await?;
        assert_eq!(staged.as_ref(), Some(&order));

        let mut reader = db.transact().await?;
        let found = InMemoryOrderRepository
            .find_by_id(&mut reader, order.id())
            .await?;
        assert!(found.is_none());

        writer.commit().await?;
        let found = InMemoryOrderRepository
            .find_by_id(&mut reader, order.id())
            .await?;
        assert_eq!(found, Some(order));
        Ok(())
    }

    #[tokio::test]
    async fn dropped_transaction_discards_writes() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let order = order(&UserId::new(Uuid::new_v4()), OffsetDateTime::now_utc());
        {
            let mut con = db.transact().await?;
            InMemoryOrderRepository.create(&mut con, &order).await?;
        }
        let mut con = db.transact().await?;
        let found = InMemoryOrderRepository.find_by_id(&mut con, order.id()).await?;
        assert!(found.is_none());

        let missing = InMemoryOrderRepository.update(&mut con, &order).await;
        assert_eq!(
            missing.map_err(|report| *report.current_context()),
            Err(KernelError::NotFound)
        );
        Ok(())
    }

    #[tokio::test]
    async fn user_orders_come_newest_first() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let user_id = UserId::new(Uuid::new_v4());
        let now = OffsetDateTime::now_utc();
        let older = order(&user_id, now - Duration::hours(1));
        let newer = order(&user_id, now);
        let other = order(&UserId::new(Uuid::new_v4()), now);

        let mut con = db.transact().await?;
        for order in [&older, &newer, &other] {
            InMemoryOrderRepository.create(&mut con, order).await?;
        }
        con.commit().await?;

        let mut con = db.transact().await?;
        let found = InMemoryOrderRepository
            .find_by_user_id(&mut con, &user_id)
            .await?;
        assert_eq!(found, vec![newer.clone(), older]);

        let page = InMemoryOrderRepository
            .find_all(&mut con, &SelectLimit::new(1), &SelectOffset::new(0))
            .await?;
        assert_eq!(page.len(), 1);
        let rest = InMemoryOrderRepository
            .find_all(&mut con, &SelectLimit::default(), &SelectOffset::new(1))
            .await?;
        assert_eq!(rest.len(), 2);
        Ok(())
    }
}
