use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    AcceptOfferRequest, CreateOfferRequest, DeleteOfferRequest, OfferIdRequest,
    OfferTransformer, OrderOffersRequest, RejectOfferRequest,
};
use crate::response::OfferPresenter;
use application::service::{
    AcceptOfferService, CreateOfferService, DeleteOfferService, GetOfferService,
    RejectOfferService,
};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

pub trait OfferRouter {
    fn route_offer(self) -> Self;
}

impl OfferRouter for Router<AppModule> {
    fn route_offer(self) -> Self {
        self.route(
            "/orders/:id/offers",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(OfferTransformer, OfferPresenter)
                        .intake(OrderOffersRequest(id))
                        .handle(|dto| async move {
                            module.handler().get_offers_by_order(dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 Path(id): Path<Uuid>,
                 Json(req): Json<CreateOfferRequest>| async move {
                    Controller::new(OfferTransformer, OfferPresenter)
                        .intake((id, req))
                        .handle(|dto| async move { module.handler().create_offer(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/orders/:id/offers/:offer_id/accept",
            post(
                |State(module): State<AppModule>,
                 Path((id, offer_id)): Path<(Uuid, Uuid)>| async move {
                    Controller::new(OfferTransformer, OfferPresenter)
                        .intake(AcceptOfferRequest::new(id, offer_id))
                        .handle(|dto| async move { module.handler().accept_offer(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/offers/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(OfferTransformer, OfferPresenter)
                        .intake(OfferIdRequest(id))
                        .handle(|dto| async move { module.handler().get_offer(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(OfferTransformer, OfferPresenter)
                        .intake(DeleteOfferRequest(id))
                        .handle(|dto| async move { module.handler().delete_offer(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/offers/:id/reject",
            post(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(OfferTransformer, OfferPresenter)
                        .intake(RejectOfferRequest(id))
                        .handle(|dto| async move { module.handler().reject_offer(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
