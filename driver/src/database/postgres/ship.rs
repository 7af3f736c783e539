use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::ShipQuery;
use kernel::prelude::entity::{PartnerId, PortId, Ship, ShipCapacity, ShipId, ShipTypeId};
use kernel::KernelError;

use crate::database::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresShipRepository;

#[async_trait::async_trait]
impl ShipQuery for PostgresShipRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &ShipId,
    ) -> error_stack::Result<Option<Ship>, KernelError> {
        PgShipInternal::find_by_id(con, id).await
    }

    async fn find_by_partner_id(
        &self,
        con: &mut PostgresTransaction,
        partner_id: &PartnerId,
    ) -> error_stack::Result<Vec<Ship>, KernelError> {
        PgShipInternal::find_by_partner_id(con, partner_id).await
    }
}

#[derive(sqlx::FromRow)]
struct ShipRow {
    id: Uuid,
    partner_id: Uuid,
    ship_type_id: Uuid,
    port_id: Uuid,
    capacity: i32,
}

impl From<ShipRow> for Ship {
    fn from(value: ShipRow) -> Self {
        Ship::new(
            ShipId::new(value.id),
            PartnerId::new(value.partner_id),
            ShipTypeId::new(value.ship_type_id),
            PortId::new(value.port_id),
            ShipCapacity::new(value.capacity),
        )
    }
}

pub(in crate::database) struct PgShipInternal;

impl PgShipInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &ShipId,
    ) -> error_stack::Result<Option<Ship>, KernelError> {
        let row = sqlx::query_as::<_, ShipRow>(
            // language=postgresql
            r#"
            SELECT id, partner_id, ship_type_id, port_id, capacity
            FROM ships
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Ship::from))
    }

    async fn find_by_partner_id(
        con: &mut PgConnection,
        partner_id: &PartnerId,
    ) -> error_stack::Result<Vec<Ship>, KernelError> {
        let rows = sqlx::query_as::<_, ShipRow>(
            // language=postgresql
            r#"
            SELECT id, partner_id, ship_type_id, port_id, capacity
            FROM ships
            WHERE partner_id = $1
            "#,
        )
        .bind(partner_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Ship::from).collect())
    }
}
