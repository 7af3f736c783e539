use application::transfer::{
    CancelOrderDto, CompleteOrderDto, CreateOrderDto, GetOrderDto, GetOrdersPageDto,
};
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    user_id: Uuid,
    ship_type_id: Uuid,
    departure_port_id: Uuid,
    arrival_port_id: Option<Uuid>,
    passenger_count: i32,
    #[serde(with = "time::serde::rfc3339")]
    start_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct GetOrdersRequest {
    limit: Option<i32>,
    offset: Option<i32>,
}

#[derive(Debug)]
pub struct OrderIdRequest {
    id: Uuid,
}

impl OrderIdRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct CompleteOrderRequest(pub Uuid);

#[derive(Debug)]
pub struct CancelOrderRequest(pub Uuid);

pub struct OrderTransformer;

impl Intake<CreateOrderRequest> for OrderTransformer {
    type To = CreateOrderDto;
    fn emit(&self, input: CreateOrderRequest) -> Self::To {
        CreateOrderDto {
            user_id: input.user_id,
            ship_type_id: input.ship_type_id,
            departure_port_id: input.departure_port_id,
            arrival_port_id: input.arrival_port_id,
            passenger_count: input.passenger_count,
            start_at: input.start_at,
            end_at: input.end_at,
        }
    }
}

impl Intake<GetOrdersRequest> for OrderTransformer {
    type To = GetOrdersPageDto;
    fn emit(&self, input: GetOrdersRequest) -> Self::To {
        GetOrdersPageDto {
            limit: input.limit,
            offset: input.offset,
        }
    }
}

impl Intake<OrderIdRequest> for OrderTransformer {
    type To = GetOrderDto;
    fn emit(&self, input: OrderIdRequest) -> Self::To {
        GetOrderDto { order_id: input.id }
    }
}

impl Intake<CompleteOrderRequest> for OrderTransformer {
    type To = CompleteOrderDto;
    fn emit(&self, CompleteOrderRequest(order_id): CompleteOrderRequest) -> Self::To {
        CompleteOrderDto { order_id }
    }
}

impl Intake<CancelOrderRequest> for OrderTransformer {
    type To = CancelOrderDto;
    fn emit(&self, CancelOrderRequest(order_id): CancelOrderRequest) -> Self::To {
        CancelOrderDto { order_id }
    }
}
