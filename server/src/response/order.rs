use application::transfer::{AgreementDto, OrderDto};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::prelude::entity::OrderStatus;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    id: Uuid,
    user_id: Uuid,
    ship_type_id: Uuid,
    departure_port_id: Uuid,
    arrival_port_id: Option<Uuid>,
    passenger_count: i32,
    #[serde(with = "time::serde::rfc3339")]
    start_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end_at: OffsetDateTime,
    status: OrderStatus,
    agreement: Option<AgreementResponse>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct AgreementResponse {
    partner_id: Uuid,
    ship_id: Uuid,
    total_price: i64,
    #[serde(with = "time::serde::rfc3339")]
    order_date: OffsetDateTime,
}

impl From<AgreementDto> for AgreementResponse {
    fn from(value: AgreementDto) -> Self {
        Self {
            partner_id: value.partner_id,
            ship_id: value.ship_id,
            total_price: value.total_price,
            order_date: value.order_date,
        }
    }
}

impl From<OrderDto> for OrderResponse {
    fn from(value: OrderDto) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            ship_type_id: value.ship_type_id,
            departure_port_id: value.departure_port_id,
            arrival_port_id: value.arrival_port_id,
            passenger_count: value.passenger_count,
            start_at: value.start_at,
            end_at: value.end_at,
            status: value.status,
            agreement: value.agreement.map(AgreementResponse::from),
            created_at: value.created_at,
        }
    }
}

impl IntoResponse for OrderResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct OrderPresenter;

impl Exhaust<()> for OrderPresenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}

impl Exhaust<OrderDto> for OrderPresenter {
    type To = (StatusCode, axum::Json<OrderResponse>);
    fn emit(&self, input: OrderDto) -> Self::To {
        (StatusCode::CREATED, axum::Json(OrderResponse::from(input)))
    }
}

impl Exhaust<Option<OrderDto>> for OrderPresenter {
    type To = Response;
    fn emit(&self, input: Option<OrderDto>) -> Self::To {
        input
            .map(|order| OrderResponse::from(order).into_response())
            .unwrap_or_else(|| StatusCode::NOT_FOUND.into_response())
    }
}

impl Exhaust<Vec<OrderDto>> for OrderPresenter {
    type To = axum::Json<Vec<OrderResponse>>;
    fn emit(&self, input: Vec<OrderDto>) -> Self::To {
        let result = input
            .into_iter()
            .map(OrderResponse::from)
            .collect::<Vec<_>>();
        axum::Json::from(result)
    }
}
