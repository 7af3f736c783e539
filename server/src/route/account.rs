use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    AccountTransformer, ActiveOrderRequest, AvailableOrdersRequest, PartnerOffersRequest,
    PartnerOrdersRequest, StatusQuery, UserOrdersRequest,
};
use crate::response::{OfferPresenter, OrderPresenter};
use application::service::{GetOfferService, GetOrderService};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use uuid::Uuid;

pub trait AccountRouter {
    fn route_account(self) -> Self;
}

impl AccountRouter for Router<AppModule> {
    fn route_account(self) -> Self {
        self.route(
            "/users/:id/orders",
            get(
                |State(module): State<AppModule>,
                 Path(id): Path<Uuid>,
                 Query(query): Query<StatusQuery>| async move {
                    Controller::new(AccountTransformer, OrderPresenter)
                        .intake(UserOrdersRequest::new(id, query))
                        .handle(|dto| async move { module.handler().get_orders_by_user(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/users/:id/orders/active",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(AccountTransformer, OrderPresenter)
                        .intake(ActiveOrderRequest(id))
                        .handle(|dto| async move { module.handler().get_active_order(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/partners/:id/orders",
            get(
                |State(module): State<AppModule>,
                 Path(id): Path<Uuid>,
                 Query(query): Query<StatusQuery>| async move {
                    Controller::new(AccountTransformer, OrderPresenter)
                        .intake(PartnerOrdersRequest::new(id, query))
                        .handle(|dto| async move {
                            module.handler().get_orders_by_partner(dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/partners/:id/orders/available",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(AccountTransformer, OrderPresenter)
                        .intake(AvailableOrdersRequest(id))
                        .handle(|dto| async move {
                            module.handler().get_available_orders(dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/partners/:id/offers",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(AccountTransformer, OfferPresenter)
                        .intake(PartnerOffersRequest(id))
                        .handle(|dto| async move {
                            module.handler().get_offers_by_partner(dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
