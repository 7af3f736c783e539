use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{PartnerId, Ship, ShipId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait ShipQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &ShipId,
    ) -> error_stack::Result<Option<Ship>, KernelError>;

    async fn find_by_partner_id(
        &self,
        con: &mut Self::Transaction,
        partner_id: &PartnerId,
    ) -> error_stack::Result<Vec<Ship>, KernelError>;
}

pub trait DependOnShipQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type ShipQuery: ShipQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn ship_query(&self) -> &Self::ShipQuery;
}
