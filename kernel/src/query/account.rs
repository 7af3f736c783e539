use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{PartnerId, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait UserQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn exists(
        &self,
        con: &mut Self::Transaction,
        id: &UserId,
    ) -> error_stack::Result<bool, KernelError>;
}

pub trait DependOnUserQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type UserQuery: UserQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn user_query(&self) -> &Self::UserQuery;
}

#[async_trait::async_trait]
pub trait PartnerQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn exists(
        &self,
        con: &mut Self::Transaction,
        id: &PartnerId,
    ) -> error_stack::Result<bool, KernelError>;
}

pub trait DependOnPartnerQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type PartnerQuery: PartnerQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn partner_query(&self) -> &Self::PartnerQuery;
}
