use std::fmt::{Display, Formatter};

use crate::entity::{PassengerCount, PortId, RentOrder, Ship, ShipCapacity, ShipTypeId};

/// First dimension in which a ship fails an order's constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnmetRequirement {
    ShipType {
        required: ShipTypeId,
        actual: ShipTypeId,
    },
    DeparturePort {
        required: PortId,
        actual: PortId,
    },
    Capacity {
        required: PassengerCount,
        actual: ShipCapacity,
    },
}

impl Display for UnmetRequirement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UnmetRequirement::ShipType { required, actual } => write!(
                f,
                "ship type {} does not match requested type {}",
                actual.as_ref(),
                required.as_ref()
            ),
            UnmetRequirement::DeparturePort { required, actual } => write!(
                f,
                "ship is based at port {} but the order departs from {}",
                actual.as_ref(),
                required.as_ref()
            ),
            UnmetRequirement::Capacity { required, actual } => write!(
                f,
                "ship capacity {} is below passenger count {}",
                actual.as_ref(),
                required.as_ref()
            ),
        }
    }
}

/// Checks type, origin and capacity, in that order.
pub fn check_eligibility(ship: &Ship, order: &RentOrder) -> Result<(), UnmetRequirement> {
    if ship.ship_type_id() != order.ship_type_id() {
        return Err(UnmetRequirement::ShipType {
            required: order.ship_type_id().clone(),
            actual: ship.ship_type_id().clone(),
        });
    }
    if ship.port_id() != order.departure_port_id() {
        return Err(UnmetRequirement::DeparturePort {
            required: order.departure_port_id().clone(),
            actual: ship.port_id().clone(),
        });
    }
    if ship.capacity().as_ref() < order.passenger_count().as_ref() {
        return Err(UnmetRequirement::Capacity {
            required: *order.passenger_count(),
            actual: *ship.capacity(),
        });
    }
    Ok(())
}
