use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    CancelOrderRequest, CompleteOrderRequest, CreateOrderRequest, GetOrdersRequest,
    OrderIdRequest, OrderTransformer,
};
use crate::response::OrderPresenter;
use application::service::{CloseOrderService, CreateOrderService, GetOrderService};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

pub trait OrderRouter {
    fn route_order(self) -> Self;
}

impl OrderRouter for Router<AppModule> {
    fn route_order(self) -> Self {
        self.route(
            "/orders",
            get(
                |State(module): State<AppModule>, Query(req): Query<GetOrdersRequest>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.handler().get_orders(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>, Json(req): Json<CreateOrderRequest>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.handler().create_order(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/orders/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake(OrderIdRequest::new(id))
                        .handle(|dto| async move { module.handler().get_order(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/orders/:id/complete",
            post(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake(CompleteOrderRequest(id))
                        .handle(|dto| async move { module.handler().complete_order(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/orders/:id/cancel",
            post(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake(CancelOrderRequest(id))
                        .handle(|dto| async move { module.handler().cancel_order(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
