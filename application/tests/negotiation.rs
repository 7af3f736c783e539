mod common;

use uuid::Uuid;

use application::service::{
    AcceptOfferService, CloseOrderService, CreateOfferService, DeleteOfferService,
    GetOfferService, GetOrderService, RejectOfferService,
};
use application::transfer::{
    AcceptOfferDto, CancelOrderDto, CompleteOrderDto, CreateOfferDto, DeleteOfferDto,
    GetOfferDto, GetOffersByOrderDto, GetOrderDto, RejectOfferDto,
};
use kernel::prelude::entity::{OfferStatus, OrderStatus};
use kernel::KernelError;

use crate::common::{kind, Market, TestModule};

#[tokio::test]
async fn accept_resolves_every_offer_once() -> error_stack::Result<(), KernelError> {
    let module = TestModule::new();
    let market = Market::open(&module)?;
    let order = market.order(&module, 4).await?;
    let p1 = market.partner(&module, 6)?;
    let p2 = market.partner(&module, 8)?;

    let o1 = p1.offer(&module, order.id, 1000).await?;
    let o2 = p2.offer(&module, order.id, 1200).await?;
    let current = module.get_order(GetOrderDto { order_id: order.id }).await?;
    assert_eq!(current.map(|order| order.status), Some(OrderStatus::HasOffers));

    module
        .accept_offer(AcceptOfferDto {
            order_id: order.id,
            offer_id: o1.id,
        })
        .await?;

    let agreed = module
        .get_order(GetOrderDto { order_id: order.id })
        .await?
        .expect("order exists");
    assert_eq!(agreed.status, OrderStatus::Agreed);
    let agreement = agreed.agreement.expect("agreement recorded");
    assert_eq!(agreement.partner_id, p1.partner_id);
    assert_eq!(agreement.ship_id, p1.ship_id);
    assert_eq!(agreement.total_price, 1000);

    let offers = module
        .get_offers_by_order(GetOffersByOrderDto { order_id: order.id })
        .await?;
    let statuses = offers
        .iter()
        .map(|offer| (offer.id, offer.status))
        .collect::<Vec<_>>();
    assert_eq!(
        statuses,
        vec![(o1.id, OfferStatus::Accepted), (o2.id, OfferStatus::Rejected)]
    );
    assert!(offers.iter().all(|offer| offer.responded_at.is_some()));

    let second = module
        .accept_offer(AcceptOfferDto {
            order_id: order.id,
            offer_id: o2.id,
        })
        .await;
    assert_eq!(kind(second), KernelError::Conflict);
    Ok(())
}

#[tokio::test]
async fn accept_checks_ownership_and_existence() -> error_stack::Result<(), KernelError> {
    let module = TestModule::new();
    let market = Market::open(&module)?;
    let first = market.order(&module, 2).await?;
    let second = market.order(&module, 2).await?;
    let partner = market.partner(&module, 4)?;
    let offer = partner.offer(&module, first.id, 500).await?;

    let foreign = module
        .accept_offer(AcceptOfferDto {
            order_id: second.id,
            offer_id: offer.id,
        })
        .await;
    assert_eq!(kind(foreign), KernelError::NotFound);

    let missing = module
        .accept_offer(AcceptOfferDto {
            order_id: Uuid::new_v4(),
            offer_id: offer.id,
        })
        .await;
    assert_eq!(kind(missing), KernelError::NotFound);
    Ok(())
}

#[tokio::test]
async fn reject_and_withdraw_keep_order_status() -> error_stack::Result<(), KernelError> {
    let module = TestModule::new();
    let market = Market::open(&module)?;
    let order = market.order(&module, 3).await?;
    let p1 = market.partner(&module, 3)?;
    let p2 = market.partner(&module, 5)?;
    let o1 = p1.offer(&module, order.id, 700).await?;
    let o2 = p2.offer(&module, order.id, 900).await?;

    module.reject_offer(RejectOfferDto { offer_id: o1.id }).await?;
    let rejected = module.get_offer(GetOfferDto { offer_id: o1.id }).await?;
    assert_eq!(rejected.map(|offer| offer.status), Some(OfferStatus::Rejected));
    let again = module.reject_offer(RejectOfferDto { offer_id: o1.id }).await;
    assert_eq!(kind(again), KernelError::Conflict);

    module.delete_offer(DeleteOfferDto { offer_id: o2.id }).await?;
    let gone = module.get_offer(GetOfferDto { offer_id: o2.id }).await?;
    assert!(gone.is_none());
    let resolved = module.delete_offer(DeleteOfferDto { offer_id: o1.id }).await;
    assert_eq!(kind(resolved), KernelError::Conflict);

    let current = module.get_order(GetOrderDto { order_id: order.id }).await?;
    assert_eq!(current.map(|order| order.status), Some(OrderStatus::HasOffers));

    // A partner whose offer was rejected may bid again.
    p1.offer(&module, order.id, 650).await?;
    Ok(())
}

#[tokio::test]
async fn create_offer_validates_its_input() -> error_stack::Result<(), KernelError> {
    let module = TestModule::new();
    let market = Market::open(&module)?;
    let order = market.order(&module, 6).await?;
    let small = market.partner(&module, 4)?;
    let large = market.partner(&module, 10)?;

    let shortfall = small.offer(&module, order.id, 1000).await;
    assert_eq!(kind(shortfall), KernelError::ShipRequirementsNotMet);

    let free = large.offer(&module, order.id, 0).await;
    assert_eq!(kind(free), KernelError::InvalidInput);

    let borrowed = module
        .create_offer(CreateOfferDto {
            order_id: order.id,
            partner_id: large.partner_id,
            ship_id: small.ship_id,
            price: 1000,
        })
        .await;
    assert_eq!(kind(borrowed), KernelError::NotFound);

    let missing = large.offer(&module, Uuid::new_v4(), 1000).await;
    assert_eq!(kind(missing), KernelError::NotFound);

    large.offer(&module, order.id, 1000).await?;
    let duplicate = large.offer(&module, order.id, 900).await;
    assert_eq!(kind(duplicate), KernelError::DuplicateOffer);

    let untouched = module.get_order(GetOrderDto { order_id: order.id }).await?;
    assert_eq!(untouched.map(|order| order.status), Some(OrderStatus::HasOffers));
    Ok(())
}

#[tokio::test]
async fn agreed_order_takes_no_more_offers() -> error_stack::Result<(), KernelError> {
    let module = TestModule::new();
    let market = Market::open(&module)?;
    let order = market.order(&module, 2).await?;
    let p1 = market.partner(&module, 2)?;
    let p2 = market.partner(&module, 2)?;
    let offer = p1.offer(&module, order.id, 300).await?;
    module
        .accept_offer(AcceptOfferDto {
            order_id: order.id,
            offer_id: offer.id,
        })
        .await?;

    let late = p2.offer(&module, order.id, 250).await;
    assert_eq!(kind(late), KernelError::InvalidOrderStatus);
    Ok(())
}

#[tokio::test]
async fn cancel_rejects_pending_offers() -> error_stack::Result<(), KernelError> {
    let module = TestModule::new();
    let market = Market::open(&module)?;
    let order = market.order(&module, 2).await?;
    for price in [100, 200, 300] {
        market.partner(&module, 2)?.offer(&module, order.id, price).await?;
    }

    module.cancel_order(CancelOrderDto { order_id: order.id }).await?;
    let offers = module
        .get_offers_by_order(GetOffersByOrderDto { order_id: order.id })
        .await?;
    assert_eq!(offers.len(), 3);
    assert!(offers
        .iter()
        .all(|offer| offer.status == OfferStatus::Rejected));

    let twice = module.cancel_order(CancelOrderDto { order_id: order.id }).await;
    assert_eq!(kind(twice), KernelError::InvalidOrderStatus);
    let complete = module
        .complete_order(CompleteOrderDto { order_id: order.id })
        .await;
    assert_eq!(kind(complete), KernelError::InvalidOrderStatus);
    Ok(())
}

#[tokio::test]
async fn complete_requires_agreement() -> error_stack::Result<(), KernelError> {
    let module = TestModule::new();
    let market = Market::open(&module)?;
    let order = market.order(&module, 2).await?;
    let early = module
        .complete_order(CompleteOrderDto { order_id: order.id })
        .await;
    assert_eq!(kind(early), KernelError::InvalidOrderStatus);

    let partner = market.partner(&module, 2)?;
    let offer = partner.offer(&module, order.id, 400).await?;
    module
        .accept_offer(AcceptOfferDto {
            order_id: order.id,
            offer_id: offer.id,
        })
        .await?;
    module
        .complete_order(CompleteOrderDto { order_id: order.id })
        .await?;
    let done = module.get_order(GetOrderDto { order_id: order.id }).await?;
    assert_eq!(done.map(|order| order.status), Some(OrderStatus::Completed));
    assert!(module.locks().is_empty());
    Ok(())
}
