use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{
    OrderId, OrderStatus, PartnerId, RentOrder, SelectLimit, SelectOffset, UserId,
};
use crate::KernelError;

#[async_trait::async_trait]
pub trait OrderQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &OrderId,
    ) -> error_stack::Result<Option<RentOrder>, KernelError>;

    /// Newest first.
    async fn find_by_user_id(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<RentOrder>, KernelError>;

    /// Orders whose agreement names the partner. Newest first.
    async fn find_by_partner_id(
        &self,
        con: &mut Self::Transaction,
        partner_id: &PartnerId,
    ) -> error_stack::Result<Vec<RentOrder>, KernelError>;

    async fn find_by_statuses(
        &self,
        con: &mut Self::Transaction,
        statuses: &[OrderStatus],
    ) -> error_stack::Result<Vec<RentOrder>, KernelError>;

    async fn find_all(
        &self,
        con: &mut Self::Transaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<RentOrder>, KernelError>;
}

pub trait DependOnOrderQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type OrderQuery: OrderQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn order_query(&self) -> &Self::OrderQuery;
}
