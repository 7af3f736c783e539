use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Offer, OfferId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait OfferModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        offer: &Offer,
    ) -> error_stack::Result<(), KernelError>;
    async fn update(
        &self,
        con: &mut Self::Transaction,
        offer: &Offer,
    ) -> error_stack::Result<(), KernelError>;
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        offer_id: &OfferId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnOfferModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type OfferModifier: OfferModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn offer_modifier(&self) -> &Self::OfferModifier;
}
