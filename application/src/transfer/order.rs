use kernel::prelude::entity::{
    DestructAgreement, DestructRentOrder, OrderStatus, RentOrder,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ship_type_id: Uuid,
    pub departure_port_id: Uuid,
    pub arrival_port_id: Option<Uuid>,
    pub passenger_count: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub start_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_at: OffsetDateTime,
    pub status: OrderStatus,
    pub agreement: Option<AgreementDto>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementDto {
    pub partner_id: Uuid,
    pub ship_id: Uuid,
    pub total_price: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub order_date: OffsetDateTime,
}

impl From<RentOrder> for OrderDto {
    fn from(value: RentOrder) -> Self {
        let DestructRentOrder {
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
        } = value.into_destruct();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            ship_type_id: ship_type_id.into(),
            departure_port_id: departure_port_id.into(),
            arrival_port_id: arrival_port_id.map(Into::into),
            passenger_count: passenger_count.into(),
            start_at: *period.start_at(),
            end_at: *period.end_at(),
            status,
            agreement: agreement.map(|agreement| {
                let DestructAgreement {
                    partner_id,
                    ship_id,
                    total_price,
                    order_date,
                } = agreement.into_destruct();
                AgreementDto {
                    partner_id: partner_id.into(),
                    ship_id: ship_id.into(),
                    total_price: total_price.into(),
                    order_date: order_date.into(),
                }
            }),
            created_at: *created_at.as_ref(),
        }
    }
}

#[derive(Debug)]
pub struct CreateOrderDto {
    pub user_id: Uuid,
    pub ship_type_id: Uuid,
    pub departure_port_id: Uuid,
    pub arrival_port_id: Option<Uuid>,
    pub passenger_count: i32,
    pub start_at: OffsetDateTime,
    pub end_at: OffsetDateTime,
}

#[derive(Debug)]
pub struct GetOrderDto {
    pub order_id: Uuid,
}

#[derive(Debug)]
pub struct GetActiveOrderDto {
    pub user_id: Uuid,
}

#[derive(Debug)]
pub struct GetOrdersByUserDto {
    pub user_id: Uuid,
    pub status: OrderStatus,
}

#[derive(Debug)]
pub struct GetOrdersByPartnerDto {
    pub partner_id: Uuid,
    pub status: OrderStatus,
}

#[derive(Debug)]
pub struct GetAvailableOrdersDto {
    pub partner_id: Uuid,
}

#[derive(Debug, Default)]
pub struct GetOrdersPageDto {
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

#[derive(Debug)]
pub struct CompleteOrderDto {
    pub order_id: Uuid,
}

#[derive(Debug)]
pub struct CancelOrderDto {
    pub order_id: Uuid,
}
