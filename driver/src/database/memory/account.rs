use kernel::interface::query::{PartnerQuery, UserQuery};
use kernel::prelude::entity::{PartnerId, UserId};
use kernel::KernelError;

use crate::database::InMemoryTransaction;

pub struct InMemoryAccountRepository;

#[async_trait::async_trait]
impl UserQuery for InMemoryAccountRepository {
    type Transaction = InMemoryTransaction;

    async fn exists(
        &self,
        con: &mut InMemoryTransaction,
        id: &UserId,
    ) -> error_stack::Result<bool, KernelError> {
        con.has_user(id)
    }
}

#[async_trait::async_trait]
impl PartnerQuery for InMemoryAccountRepository {
    type Transaction = InMemoryTransaction;

    async fn exists(
        &self,
        con: &mut InMemoryTransaction,
        id: &PartnerId,
    ) -> error_stack::Result<bool, KernelError> {
        con.has_partner(id)
    }
}
