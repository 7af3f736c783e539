use application::transfer::{
    AcceptOfferDto, CreateOfferDto, DeleteOfferDto, GetOfferDto, GetOffersByOrderDto,
    RejectOfferDto,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct CreateOfferRequest {
    partner_id: Uuid,
    ship_id: Uuid,
    price: i64,
}

#[derive(Debug)]
pub struct AcceptOfferRequest {
    order_id: Uuid,
    offer_id: Uuid,
}

impl AcceptOfferRequest {
    pub fn new(order_id: Uuid, offer_id: Uuid) -> Self {
        Self { order_id, offer_id }
    }
}

#[derive(Debug)]
pub struct OfferIdRequest(pub Uuid);

#[derive(Debug)]
pub struct RejectOfferRequest(pub Uuid);

#[derive(Debug)]
pub struct DeleteOfferRequest(pub Uuid);

#[derive(Debug)]
pub struct OrderOffersRequest(pub Uuid);

pub struct OfferTransformer;

impl Intake<(Uuid, CreateOfferRequest)> for OfferTransformer {
    type To = CreateOfferDto;
    fn emit(&self, (order_id, input): (Uuid, CreateOfferRequest)) -> Self::To {
        CreateOfferDto {
            order_id,
            partner_id: input.partner_id,
            ship_id: input.ship_id,
            price: input.price,
        }
    }
}

impl Intake<AcceptOfferRequest> for OfferTransformer {
    type To = AcceptOfferDto;
    fn emit(&self, input: AcceptOfferRequest) -> Self::To {
        AcceptOfferDto {
            order_id: input.order_id,
            offer_id: input.offer_id,
        }
    }
}

impl Intake<OfferIdRequest> for OfferTransformer {
    type To = GetOfferDto;
    fn emit(&self, OfferIdRequest(offer_id): OfferIdRequest) -> Self::To {
        GetOfferDto { offer_id }
    }
}

impl Intake<RejectOfferRequest> for OfferTransformer {
    type To = RejectOfferDto;
    fn emit(&self, RejectOfferRequest(offer_id): RejectOfferRequest) -> Self::To {
        RejectOfferDto { offer_id }
    }
}

impl Intake<DeleteOfferRequest> for OfferTransformer {
    type To = DeleteOfferDto;
    fn emit(&self, DeleteOfferRequest(offer_id): DeleteOfferRequest) -> Self::To {
        DeleteOfferDto { offer_id }
    }
}

impl Intake<OrderOffersRequest> for OfferTransformer {
    type To = GetOffersByOrderDto;
    fn emit(&self, OrderOffersRequest(order_id): OrderOffersRequest) -> Self::To {
        GetOffersByOrderDto { order_id }
    }
}
