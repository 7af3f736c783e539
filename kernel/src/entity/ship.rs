mod capacity;
mod eligibility;
mod id;
mod ship_type;

pub use self::{capacity::*, eligibility::*, id::*, ship_type::*};
use crate::entity::{PartnerId, PortId};
use destructure::Destructure;
use serde::{Deserialize, Serialize};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure)]
pub struct Ship {
    id: ShipId,
    partner_id: PartnerId,
    ship_type_id: ShipTypeId,
    port_id: PortId,
    capacity: ShipCapacity,
}

impl Ship {
    pub fn new(
        id: ShipId,
        partner_id: PartnerId,
        ship_type_id: ShipTypeId,
        port_id: PortId,
        capacity: ShipCapacity,
    ) -> Self {
        Self {
            id,
            partner_id,
            ship_type_id,
            port_id,
            capacity,
        }
    }

    pub fn is_owned_by(&self, partner_id: &PartnerId) -> bool {
        &self.partner_id == partner_id
    }
}
