use kernel::prelude::entity::{DestructOffer, Offer, OfferStatus};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferDto {
    pub id: Uuid,
    pub order_id: Uuid,
    pub partner_id: Uuid,
    pub ship_id: Uuid,
    pub price: i64,
    pub status: OfferStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub responded_at: Option<OffsetDateTime>,
}

impl From<Offer> for OfferDto {
    fn from(value: Offer) -> Self {
        let DestructOffer {
            id,
            order_id,
            partner_id,
            ship_id,
            price,
            status,
            created_at,
            responded_at,
        } = value.into_destruct();
        Self {
            id: id.into(),
            order_id: order_id.into(),
            partner_id: partner_id.into(),
            ship_id: ship_id.into(),
            price: price.into(),
            status,
            created_at: *created_at.as_ref(),
            responded_at: responded_at.map(Into::into),
        }
    }
}

#[derive(Debug)]
pub struct CreateOfferDto {
    pub order_id: Uuid,
    pub partner_id: Uuid,
    pub ship_id: Uuid,
    pub price: i64,
}

#[derive(Debug)]
pub struct AcceptOfferDto {
    pub order_id: Uuid,
    pub offer_id: Uuid,
}

#[derive(Debug)]
pub struct RejectOfferDto {
    pub offer_id: Uuid,
}

#[derive(Debug)]
pub struct DeleteOfferDto {
    pub offer_id: Uuid,
}

#[derive(Debug)]
pub struct GetOfferDto {
    pub offer_id: Uuid,
}

#[derive(Debug)]
pub struct GetOffersByOrderDto {
    pub order_id: Uuid,
}

#[derive(Debug)]
pub struct GetOffersByPartnerDto {
    pub partner_id: Uuid,
}
