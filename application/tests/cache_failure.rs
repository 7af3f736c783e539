mod common;

use application::service::{
    AcceptOfferService, GetOfferService, GetOrderService, RejectOfferService,
};
use application::transfer::{
    AcceptOfferDto, GetActiveOrderDto, GetOfferDto, GetOffersByOrderDto, GetOrderDto,
    RejectOfferDto,
};
use kernel::prelude::entity::{OfferStatus, OrderStatus};
use kernel::KernelError;

use crate::common::{BrokenCache, Market, TestModule};

#[tokio::test]
async fn failing_cache_falls_through_to_the_store() -> error_stack::Result<(), KernelError> {
    let module = TestModule::with_cache(BrokenCache::default());
    let market = Market::open(&module)?;
    let order = market.order(&module, 3).await?;
    let p1 = market.partner(&module, 4)?;
    let p2 = market.partner(&module, 5)?;
    let o1 = p1.offer(&module, order.id, 900).await?;
    let o2 = p2.offer(&module, order.id, 950).await?;

    let offers = module
        .get_offers_by_order(GetOffersByOrderDto { order_id: order.id })
        .await?;
    assert_eq!(
        offers.iter().map(|offer| offer.id).collect::<Vec<_>>(),
        vec![o1.id, o2.id]
    );
    let active = module
        .get_active_order(GetActiveOrderDto {
            user_id: market.user_id,
        })
        .await?;
    assert_eq!(active.map(|order| order.status), Some(OrderStatus::HasOffers));

    module
        .accept_offer(AcceptOfferDto {
            order_id: order.id,
            offer_id: o2.id,
        })
        .await?;

    let offers = module
        .get_offers_by_order(GetOffersByOrderDto { order_id: order.id })
        .await?;
    assert_eq!(
        offers
            .iter()
            .map(|offer| (offer.id, offer.status))
            .collect::<Vec<_>>(),
        vec![(o1.id, OfferStatus::Rejected), (o2.id, OfferStatus::Accepted)]
    );
    let active = module
        .get_active_order(GetActiveOrderDto {
            user_id: market.user_id,
        })
        .await?
        .expect("agreed order is still active");
    assert_eq!(active.status, OrderStatus::Agreed);
    assert_eq!(
        active.agreement.map(|agreement| agreement.partner_id),
        Some(p2.partner_id)
    );
    let found = module.get_order(GetOrderDto { order_id: order.id }).await?;
    assert_eq!(found.map(|order| order.status), Some(OrderStatus::Agreed));

    assert!(module.cache().failures() > 0);
    Ok(())
}

#[tokio::test]
async fn failing_cache_does_not_undo_a_write() -> error_stack::Result<(), KernelError> {
    let module = TestModule::with_cache(BrokenCache::default());
    let market = Market::open(&module)?;
    let order = market.order(&module, 2).await?;
    let partner = market.partner(&module, 2)?;
    let offer = partner.offer(&module, order.id, 400).await?;

    let before = module.cache().failures();
    module
        .reject_offer(RejectOfferDto { offer_id: offer.id })
        .await?;
    assert!(module.cache().failures() > before);

    let rejected = module
        .get_offer(GetOfferDto { offer_id: offer.id })
        .await?
        .expect("offer exists");
    assert_eq!(rejected.status, OfferStatus::Rejected);
    Ok(())
}
