use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::OfferQuery;
use kernel::interface::update::OfferModifier;
use kernel::prelude::entity::{
    CreatedAt, Offer, OfferId, OrderId, PartnerId, Price, RespondedAt, ShipId,
};
use kernel::KernelError;

use crate::database::postgres::{parse_column, single_row};
use crate::database::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresOfferRepository;

#[async_trait::async_trait]
impl OfferQuery for PostgresOfferRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &OfferId,
    ) -> error_stack::Result<Option<Offer>, KernelError> {
        PgOfferInternal::find_by_id(con, id).await
    }

    async fn find_by_order_id(
        &self,
        con: &mut PostgresTransaction,
        order_id: &OrderId,
    ) -> error_stack::Result<Vec<Offer>, KernelError> {
        PgOfferInternal::find_by_order_id(con, order_id).await
    }

    async fn find_by_partner_id(
        &self,
        con: &mut PostgresTransaction,
        partner_id: &PartnerId,
    ) -> error_stack::Result<Vec<Offer>, KernelError> {
        PgOfferInternal::find_by_partner_id(con, partner_id).await
    }
}

#[async_trait::async_trait]
impl OfferModifier for PostgresOfferRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        offer: &Offer,
    ) -> error_stack::Result<(), KernelError> {
        PgOfferInternal::create(con, offer).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        offer: &Offer,
    ) -> error_stack::Result<(), KernelError> {
        PgOfferInternal::update(con, offer).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        offer_id: &OfferId,
    ) -> error_stack::Result<(), KernelError> {
        PgOfferInternal::delete(con, offer_id).await
    }
}

#[derive(sqlx::FromRow)]
struct OfferRow {
    id: Uuid,
    order_id: Uuid,
    partner_id: Uuid,
    ship_id: Uuid,
    price: i64,
    status: String,
    created_at: OffsetDateTime,
    responded_at: Option<OffsetDateTime>,
}

impl TryFrom<OfferRow> for Offer {
    type Error = error_stack::Report<KernelError>;
    fn try_from(value: OfferRow) -> Result<Self, Self::Error> {
        Ok(Offer::new(
            OfferId::new(value.id),
            OrderId::new(value.order_id),
            PartnerId::new(value.partner_id),
            ShipId::new(value.ship_id),
            Price::new(value.price),
            parse_column("status", &value.status)?,
            CreatedAt::new(value.created_at),
            value.responded_at.map(RespondedAt::new),
        ))
    }
}

pub(in crate::database) struct PgOfferInternal;

impl PgOfferInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &OfferId,
    ) -> error_stack::Result<Option<Offer>, KernelError> {
        let row = sqlx::query_as::<_, OfferRow>(
            // language=postgresql
            r#"
            SELECT id, order_id, partner_id, ship_id, price, status, created_at, responded_at
            FROM rent_order_offers
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Offer::try_from).transpose()
    }

    async fn find_by_order_id(
        con: &mut PgConnection,
        order_id: &OrderId,
    ) -> error_stack::Result<Vec<Offer>, KernelError> {
        let rows = sqlx::query_as::<_, OfferRow>(
            // language=postgresql
            r#"
            SELECT id, order_id, partner_id, ship_id, price, status, created_at, responded_at
            FROM rent_order_offers
            WHERE order_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(order_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Offer::try_from).collect()
    }

    async fn find_by_partner_id(
        con: &mut PgConnection,
        partner_id: &PartnerId,
    ) -> error_stack::Result<Vec<Offer>, KernelError> {
        let rows = sqlx::query_as::<_, OfferRow>(
            // language=postgresql
            r#"
            SELECT id, order_id, partner_id, ship_id, price, status, created_at, responded_at
            FROM rent_order_offers
            WHERE partner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(partner_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Offer::try_from).collect()
    }

    async fn create(con: &mut PgConnection, offer: &Offer) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO rent_order_offers
                (id, order_id, partner_id, ship_id, price, status, created_at, responded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(offer.id().as_ref())
        .bind(offer.order_id().as_ref())
        .bind(offer.partner_id().as_ref())
        .bind(offer.ship_id().as_ref())
        .bind(offer.price().as_ref())
        .bind(offer.status().as_str())
        .bind(offer.created_at().as_ref())
        .bind(offer.responded_at().as_ref().map(|at| *at.as_ref()))
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, offer: &Offer) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            UPDATE rent_order_offers
            SET status = $2, responded_at = $3
            WHERE id = $1
            "#,
        )
        .bind(offer.id().as_ref())
        .bind(offer.status().as_str())
        .bind(offer.responded_at().as_ref().map(|at| *at.as_ref()))
        .execute(con)
        .await
        .convert_error()?;
        single_row(result, "Offer", offer.id().as_ref())
    }

    async fn delete(
        con: &mut PgConnection,
        offer_id: &OfferId,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            DELETE FROM rent_order_offers
            WHERE id = $1
            "#,
        )
        .bind(offer_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        single_row(result, "Offer", offer_id.as_ref())
    }
}

#[cfg(test)]
mod test {
    use time::OffsetDateTime;
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::OfferQuery;
    use kernel::interface::update::OfferModifier;
    use kernel::prelude::entity::{
        CreatedAt, Offer, OfferId, OfferStatus, OrderId, PartnerId, Price, RespondedAt, ShipId,
    };
    use kernel::KernelError;

    use crate::database::{PostgresDatabase, PostgresOfferRepository};

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let now = OffsetDateTime::from_unix_timestamp(OffsetDateTime::now_utc().unix_timestamp())
            .map_err(|_| error_stack::Report::new(KernelError::Internal))?;
        let partner_id = PartnerId::new(Uuid::new_v4());
        let mut offer = Offer::new(
            OfferId::new(Uuid::new_v4()),
            OrderId::new(Uuid::new_v4()),
            partner_id.clone(),
            ShipId::new(Uuid::new_v4()),
            Price::new(800),
            OfferStatus::Pending,
            CreatedAt::new(now),
            None,
        );
        PostgresOfferRepository.create(&mut con, &offer).await?;

        offer.accept(RespondedAt::new(now));
        PostgresOfferRepository.update(&mut con, &offer).await?;
        let found = PostgresOfferRepository
            .find_by_partner_id(&mut con, &partner_id)
            .await?;
        assert_eq!(found, vec![offer.clone()]);

        PostgresOfferRepository.delete(&mut con, offer.id()).await?;
        let found = PostgresOfferRepository.find_by_id(&mut con, offer.id()).await?;
        assert!(found.is_none());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn missing_row_is_not_found() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let offer = Offer::new(
            OfferId::new(Uuid::new_v4()),
            OrderId::new(Uuid::new_v4()),
            PartnerId::new(Uuid::new_v4()),
            ShipId::new(Uuid::new_v4()),
            Price::new(100),
            OfferStatus::Pending,
            CreatedAt::new(OffsetDateTime::now_utc()),
            None,
        );
        let updated = PostgresOfferRepository.update(&mut con, &offer).await;
        assert_eq!(
            updated.map_err(|report| *report.current_context()),
            Err(KernelError::NotFound)
        );
        let deleted = PostgresOfferRepository.delete(&mut con, offer.id()).await;
        assert_eq!(
            deleted.map_err(|report| *report.current_context()),
            Err(KernelError::NotFound)
        );
        Ok(())
    }
}
