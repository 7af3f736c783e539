use application::transfer::OfferDto;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::prelude::entity::OfferStatus;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct OfferResponse {
    id: Uuid,
    order_id: Uuid,
    partner_id: Uuid,
    ship_id: Uuid,
    price: i64,
    status: OfferStatus,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    responded_at: Option<OffsetDateTime>,
}

impl From<OfferDto> for OfferResponse {
    fn from(value: OfferDto) -> Self {
        Self {
            id: value.id,
            order_id: value.order_id,
            partner_id: value.partner_id,
            ship_id: value.ship_id,
            price: value.price,
            status: value.status,
            created_at: value.created_at,
            responded_at: value.responded_at,
        }
    }
}

impl IntoResponse for OfferResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct OfferPresenter;

impl Exhaust<()> for OfferPresenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}

impl Exhaust<OfferDto> for OfferPresenter {
    type To = (StatusCode, axum::Json<OfferResponse>);
    fn emit(&self, input: OfferDto) -> Self::To {
        (StatusCode::CREATED, axum::Json(OfferResponse::from(input)))
    }
}

impl Exhaust<Option<OfferDto>> for OfferPresenter {
    type To = Response;
    fn emit(&self, input: Option<OfferDto>) -> Self::To {
        input
            .map(|offer| OfferResponse::from(offer).into_response())
            .unwrap_or_else(|| StatusCode::NOT_FOUND.into_response())
    }
}

impl Exhaust<Vec<OfferDto>> for OfferPresenter {
    type To = axum::Json<Vec<OfferResponse>>;
    fn emit(&self, input: Vec<OfferDto>) -> Self::To {
        axum::Json::from(
            input
                .into_iter()
                .map(OfferResponse::from)
                .collect::<Vec<_>>(),
        )
    }
}
