use destructure::Destructure;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use vodca::{AsRefln, Fromln, References};

use crate::entity::{PartnerId, Price, ShipId};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct OrderDate(#[serde(with = "time::serde::rfc3339")] OffsetDateTime);

impl OrderDate {
    pub fn new(time: impl Into<OffsetDateTime>) -> Self {
        Self(time.into())
    }
}

/// Terms copied onto an order when one of its offers is accepted.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure)]
pub struct Agreement {
    partner_id: PartnerId,
    ship_id: ShipId,
    total_price: Price,
    order_date: OrderDate,
}

impl Agreement {
    pub fn new(partner_id: PartnerId, ship_id: ShipId, total_price: Price, order_date: OrderDate) -> Self {
        Self {
            partner_id,
            ship_id,
            total_price,
            order_date,
        }
    }
}
