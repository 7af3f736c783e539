mod agreement;
mod id;
mod passenger;
mod period;
mod status;

pub use self::{agreement::*, id::*, passenger::*, period::*, status::*};
use crate::entity::{CreatedAt, PortId, ShipTypeId, UserId};
use destructure::{Destructure, Mutation};
use serde::{Deserialize, Serialize};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure, Mutation)]
pub struct RentOrder {
    id: OrderId,
    user_id: UserId,
    ship_type_id: ShipTypeId,
    departure_port_id: PortId,
    arrival_port_id: Option<PortId>,
    passenger_count: PassengerCount,
    period: RentalPeriod,
    status: OrderStatus,
    agreement: Option<Agreement>,
    created_at: CreatedAt<RentOrder>,
}

impl RentOrder {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: OrderId,
        user_id: UserId,
        ship_type_id: ShipTypeId,
        departure_port_id: PortId,
        arrival_port_id: Option<PortId>,
        passenger_count: PassengerCount,
        period: RentalPeriod,
        status: OrderStatus,
        agreement: Option<Agreement>,
        created_at: CreatedAt<RentOrder>,
    ) -> Self {
        Self {
            id,
            user_id,
            ship_type_id,
            departure_port_id,
            arrival_port_id,
            passenger_count,
            period,
            status,
            agreement,
            created_at,
        }
    }

    /// First offer moves the order out of `AwaitingResponse`. Returns whether the status changed.
    pub fn receive_offer(&mut self) -> bool {
        if self.status != OrderStatus::AwaitingResponse {
            return false;
        }
        self.substitute(|order| *order.status = OrderStatus::HasOffers);
        true
    }

    pub fn agree(&mut self, agreement: Agreement) {
        self.substitute(|order| {
            *order.status = OrderStatus::Agreed;
            *order.agreement = Some(agreement);
        });
    }

    pub fn complete(&mut self) {
        self.substitute(|order| *order.status = OrderStatus::Completed);
    }

    pub fn cancel(&mut self) {
        self.substitute(|order| *order.status = OrderStatus::Cancelled);
    }

    /// Renter's order that still needs attention: anything not yet completed or cancelled.
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }
}
