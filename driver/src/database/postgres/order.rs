use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::OrderQuery;
use kernel::interface::update::OrderModifier;
use kernel::prelude::entity::{
    Agreement, CreatedAt, OrderDate, OrderId, OrderStatus, PartnerId, PassengerCount, PortId,
    Price, RentOrder, RentalPeriod, SelectLimit, SelectOffset, ShipId, ShipTypeId, UserId,
};
use kernel::KernelError;

use crate::database::postgres::{parse_column, single_row};
use crate::database::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresOrderRepository;

#[async_trait::async_trait]
impl OrderQuery for PostgresOrderRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &OrderId,
    ) -> error_stack::Result<Option<RentOrder>, KernelError> {
        PgOrderInternal::find_by_id(con, id).await
    }

    async fn find_by_user_id(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<RentOrder>, KernelError> {
        PgOrderInternal::find_by_user_id(con, user_id).await
    }

    async fn find_by_partner_id(
        &self,
        con: &mut PostgresTransaction,
        partner_id: &PartnerId,
    ) -> error_stack::Result<Vec<RentOrder>, KernelError> {
        PgOrderInternal::find_by_partner_id(con, partner_id).await
    }

    async fn find_by_statuses(
        &self,
        con: &mut PostgresTransaction,
        statuses: &[OrderStatus],
    ) -> error_stack::Result<Vec<RentOrder>, KernelError> {
        PgOrderInternal::find_by_statuses(con, statuses).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<RentOrder>, KernelError> {
        PgOrderInternal::find_all(con, limit, offset).await
    }
}

#[async_trait::async_trait]
impl OrderModifier for PostgresOrderRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        order: &RentOrder,
    ) -> error_stack::Result<(), KernelError> {
        PgOrderInternal::create(con, order).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        order: &RentOrder,
    ) -> error_stack::Result<(), KernelError> {
        PgOrderInternal::update(con, order).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        order_id: &OrderId,
    ) -> error_stack::Result<(), KernelError> {
        PgOrderInternal::delete(con, order_id).await
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    ship_type_id: Uuid,
    departure_port_id: Uuid,
    arrival_port_id: Option<Uuid>,
    passenger_count: i32,
    start_at: OffsetDateTime,
    end_at: OffsetDateTime,
    status: String,
    agreed_partner_id: Option<Uuid>,
    agreed_ship_id: Option<Uuid>,
    total_price: Option<i64>,
    order_date: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
}

impl TryFrom<OrderRow> for RentOrder {
    type Error = error_stack::Report<KernelError>;
    fn try_from(value: OrderRow) -> Result<Self, Self::Error> {
        let agreement = match (
            value.agreed_partner_id,
            value.agreed_ship_id,
            value.total_price,
            value.order_date,
        ) {
            (Some(partner_id), Some(ship_id), Some(total_price), Some(order_date)) => {
                Some(Agreement::new(
                    PartnerId::new(partner_id),
                    ShipId::new(ship_id),
                    Price::new(total_price),
                    OrderDate::new(order_date),
                ))
            }
            _ => None,
        };
        Ok(RentOrder::new(
            OrderId::new(value.id),
            UserId::new(value.user_id),
            ShipTypeId::new(value.ship_type_id),
            PortId::new(value.departure_port_id),
            value.arrival_port_id.map(PortId::new),
            PassengerCount::new(value.passenger_count),
            RentalPeriod::new(value.start_at, value.end_at),
            parse_column("status", &value.status)?,
            agreement,
            CreatedAt::new(value.created_at),
        ))
    }
}

fn into_orders(rows: Vec<OrderRow>) -> error_stack::Result<Vec<RentOrder>, KernelError> {
    rows.into_iter().map(RentOrder::try_from).collect()
}

pub(in crate::database) struct PgOrderInternal;

impl PgOrderInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &OrderId,
    ) -> error_stack::Result<Option<RentOrder>, KernelError> {
        let row = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT *
            FROM rent_orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(RentOrder::try_from).transpose()
    }

    async fn find_by_user_id(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<RentOrder>, KernelError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT *
            FROM rent_orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        into_orders(rows)
    }

    async fn find_by_partner_id(
        con: &mut PgConnection,
        partner_id: &PartnerId,
    ) -> error_stack::Result<Vec<RentOrder>, KernelError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT *
            FROM rent_orders
            WHERE agreed_partner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(partner_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        into_orders(rows)
    }

    async fn find_by_statuses(
        con: &mut PgConnection,
        statuses: &[OrderStatus],
    ) -> error_stack::Result<Vec<RentOrder>, KernelError> {
        let statuses = statuses
            .iter()
            .map(|status| status.as_str().to_string())
            .collect::<Vec<_>>();
        let rows = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT *
            FROM rent_orders
            WHERE status = ANY($1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(statuses)
        .fetch_all(con)
        .await
        .convert_error()?;
        into_orders(rows)
    }

    async fn find_all(
        con: &mut PgConnection,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<RentOrder>, KernelError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT *
            FROM rent_orders
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit.as_ref())
        .bind(offset.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        into_orders(rows)
    }

    async fn create(
        con: &mut PgConnection,
        order: &RentOrder,
    ) -> error_stack::Result<(), KernelError> {
        let agreement = order.agreement().as_ref();
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO rent_orders (
                id, user_id, ship_type_id, departure_port_id, arrival_port_id, passenger_count,
                start_at, end_at, status, agreed_partner_id, agreed_ship_id, total_price,
                order_date, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(order.id().as_ref())
        .bind(order.user_id().as_ref())
        .bind(order.ship_type_id().as_ref())
        .bind(order.departure_port_id().as_ref())
        .bind(order.arrival_port_id().as_ref().map(|id| *id.as_ref()))
        .bind(order.passenger_count().as_ref())
        .bind(order.period().start_at())
        .bind(order.period().end_at())
        .bind(order.status().as_str())
        .bind(agreement.map(|agreement| *agreement.partner_id().as_ref()))
        .bind(agreement.map(|agreement| *agreement.ship_id().as_ref()))
        .bind(agreement.map(|agreement| *agreement.total_price().as_ref()))
        .bind(agreement.map(|agreement| *agreement.order_date().as_ref()))
        .bind(order.created_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(
        con: &mut PgConnection,
        order: &RentOrder,
    ) -> error_stack::Result<(), KernelError> {
        let agreement = order.agreement().as_ref();
        // language=postgresql
        let result = sqlx::query(
            r#"
            UPDATE rent_orders
            SET status = $2, agreed_partner_id = $3, agreed_ship_id = $4, total_price = $5,
                order_date = $6
            WHERE id = $1
            "#,
        )
        .bind(order.id().as_ref())
        .bind(order.status().as_str())
        .bind(agreement.map(|agreement| *agreement.partner_id().as_ref()))
        .bind(agreement.map(|agreement| *agreement.ship_id().as_ref()))
        .bind(agreement.map(|agreement| *agreement.total_price().as_ref()))
        .bind(agreement.map(|agreement| *agreement.order_date().as_ref()))
        .execute(con)
        .await
        .convert_error()?;
        single_row(result, "Order", order.id().as_ref())
    }

    async fn delete(
        con: &mut PgConnection,
        order_id: &OrderId,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            DELETE FROM rent_orders
            WHERE id = $1
            "#,
        )
        .bind(order_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        single_row(result, "Order", order_id.as_ref())
    }
}

#[cfg(test)]
mod test {
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::OrderQuery;
    use kernel::interface::update::OrderModifier;
    use kernel::prelude::entity::{
        Agreement, CreatedAt, OrderDate, OrderId, OrderStatus, PartnerId, PassengerCount, PortId,
        Price, RentOrder, RentalPeriod, ShipId, ShipTypeId, UserId,
    };
    use kernel::KernelError;

    use crate::database::{PostgresDatabase, PostgresOrderRepository};

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        // Whole seconds so the round trip through timestamptz compares equal.
        let now = OffsetDateTime::from_unix_timestamp(OffsetDateTime::now_utc().unix_timestamp())
            .map_err(|_| error_stack::Report::new(KernelError::Internal))?;
        let mut order = RentOrder::new(
            OrderId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            ShipTypeId::new(Uuid::new_v4()),
            PortId::new(Uuid::new_v4()),
            None,
            PassengerCount::new(3),
            RentalPeriod::new(now, now + Duration::days(1)),
            OrderStatus::AwaitingResponse,
            None,
            CreatedAt::new(now),
        );
        PostgresOrderRepository.create(&mut con, &order).await?;

        let found = PostgresOrderRepository.find_by_id(&mut con, order.id()).await?;
        assert_eq!(found.as_ref(), Some(&order));

        order.receive_offer();
        order.agree(Agreement::new(
            PartnerId::new(Uuid::new_v4()),
            ShipId::new(Uuid::new_v4()),
            Price::new(5000),
            OrderDate::new(now),
        ));
        PostgresOrderRepository.update(&mut con, &order).await?;
        let found = PostgresOrderRepository
            .find_by_statuses(&mut con, &[OrderStatus::Agreed])
            .await?;
        assert!(found.contains(&order));

        PostgresOrderRepository.delete(&mut con, order.id()).await?;
        let found = PostgresOrderRepository.find_by_id(&mut con, order.id()).await?;
        assert!(found.is_none());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn missing_row_is_not_found() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let now = OffsetDateTime::now_utc();
        let order = RentOrder::new(
            OrderId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            ShipTypeId::new(Uuid::new_v4()),
            PortId::new(Uuid::new_v4()),
            None,
            PassengerCount::new(1),
            RentalPeriod::new(now, now + Duration::days(1)),
            OrderStatus::AwaitingResponse,
            None,
            CreatedAt::new(now),
        );
        let updated = PostgresOrderRepository.update(&mut con, &order).await;
        assert_eq!(
            updated.map_err(|report| *report.current_context()),
            Err(KernelError::NotFound)
        );
        let deleted = PostgresOrderRepository.delete(&mut con, order.id()).await;
        assert_eq!(
            deleted.map_err(|report| *report.current_context()),
            Err(KernelError::NotFound)
        );
        Ok(())
    }
}
