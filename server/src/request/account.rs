use application::transfer::{
    GetActiveOrderDto, GetAvailableOrdersDto, GetOffersByPartnerDto, GetOrdersByPartnerDto,
    GetOrdersByUserDto,
};
use kernel::prelude::entity::OrderStatus;
use serde::Deserialize;
use uuid::Uuid;

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    status: OrderStatus,
}

#[derive(Debug)]
pub struct UserOrdersRequest {
    user_id: Uuid,
    status: OrderStatus,
}

impl UserOrdersRequest {
    pub fn new(user_id: Uuid, StatusQuery { status }: StatusQuery) -> Self {
        Self { user_id, status }
    }
}

#[derive(Debug)]
pub struct PartnerOrdersRequest {
    partner_id: Uuid,
    status: OrderStatus,
}

impl PartnerOrdersRequest {
    pub fn new(partner_id: Uuid, StatusQuery { status }: StatusQuery) -> Self {
        Self { partner_id, status }
    }
}

#[derive(Debug)]
pub struct ActiveOrderRequest(pub Uuid);

#[derive(Debug)]
pub struct AvailableOrdersRequest(pub Uuid);

#[derive(Debug)]
pub struct PartnerOffersRequest(pub Uuid);

pub struct AccountTransformer;

impl Intake<ActiveOrderRequest> for AccountTransformer {
    type To = GetActiveOrderDto;
    fn emit(&self, ActiveOrderRequest(user_id): ActiveOrderRequest) -> Self::To {
        GetActiveOrderDto { user_id }
    }
}

impl Intake<UserOrdersRequest> for AccountTransformer {
    type To = GetOrdersByUserDto;
    fn emit(&self, input: UserOrdersRequest) -> Self::To {
        GetOrdersByUserDto {
            user_id: input.user_id,
            status: input.status,
        }
    }
}

impl Intake<PartnerOrdersRequest> for AccountTransformer {
    type To = GetOrdersByPartnerDto;
    fn emit(&self, input: PartnerOrdersRequest) -> Self::To {
        GetOrdersByPartnerDto {
            partner_id: input.partner_id,
            status: input.status,
        }
    }
}

impl Intake<AvailableOrdersRequest> for AccountTransformer {
    type To = GetAvailableOrdersDto;
    fn emit(&self, AvailableOrdersRequest(partner_id): AvailableOrdersRequest) -> Self::To {
        GetAvailableOrdersDto { partner_id }
    }
}

impl Intake<PartnerOffersRequest> for AccountTransformer {
    type To = GetOffersByPartnerDto;
    fn emit(&self, PartnerOffersRequest(partner_id): PartnerOffersRequest) -> Self::To {
        GetOffersByPartnerDto { partner_id }
    }
}
