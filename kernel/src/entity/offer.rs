mod id;
mod responded_at;
mod status;

pub use self::{id::*, responded_at::*, status::*};
use crate::entity::{CreatedAt, OrderId, PartnerId, Price, ShipId};
use destructure::{Destructure, Mutation};
use serde::{Deserialize, Serialize};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure, Mutation)]
pub struct Offer {
    id: OfferId,
    order_id: OrderId,
    partner_id: PartnerId,
    ship_id: ShipId,
    price: Price,
    status: OfferStatus,
    created_at: CreatedAt<Offer>,
    responded_at: Option<RespondedAt>,
}

impl Offer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: OfferId,
        order_id: OrderId,
        partner_id: PartnerId,
        ship_id: ShipId,
        price: Price,
        status: OfferStatus,
        created_at: CreatedAt<Offer>,
        responded_at: Option<RespondedAt>,
    ) -> Self {
        Self {
            id,
            order_id,
            partner_id,
            ship_id,
            price,
            status,
            created_at,
            responded_at,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == OfferStatus::Pending
    }

    pub fn accept(&mut self, at: RespondedAt) {
        self.resolve(OfferStatus::Accepted, at);
    }

    pub fn reject(&mut self, at: RespondedAt) {
        self.resolve(OfferStatus::Rejected, at);
    }

    fn resolve(&mut self, status: OfferStatus, at: RespondedAt) {
        self.substitute(|offer| {
            *offer.status = status;
            *offer.responded_at = Some(at);
        });
    }
}
