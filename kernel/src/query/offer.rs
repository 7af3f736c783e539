use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Offer, OfferId, OrderId, PartnerId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait OfferQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &OfferId,
    ) -> error_stack::Result<Option<Offer>, KernelError>;

    /// Oldest first.
    async fn find_by_order_id(
        &self,
        con: &mut Self::Transaction,
        order_id: &OrderId,
    ) -> error_stack::Result<Vec<Offer>, KernelError>;

    /// Newest first.
    async fn find_by_partner_id(
        &self,
        con: &mut Self::Transaction,
        partner_id: &PartnerId,
    ) -> error_stack::Result<Vec<Offer>, KernelError>;
}

pub trait DependOnOfferQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type OfferQuery: OfferQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn offer_query(&self) -> &Self::OfferQuery;
}
