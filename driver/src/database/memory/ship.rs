use kernel::interface::query::ShipQuery;
use kernel::prelude::entity::{PartnerId, Ship, ShipId};
use kernel::KernelError;

use crate::database::InMemoryTransaction;

pub struct InMemoryShipRepository;

#[async_trait::async_trait]
impl ShipQuery for InMemoryShipRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &ShipId,
    ) -> error_stack::Result<Option<Ship>, KernelError> {
        con.ship(id)
    }

    async fn find_by_partner_id(
        &self,
        con: &mut InMemoryTransaction,
        partner_id: &PartnerId,
    ) -> error_stack::Result<Vec<Ship>, KernelError> {
        con.ships_of(partner_id)
    }
}
