use std::fmt::{Display, Formatter};
use std::time::Duration;

use crate::entity::{OfferId, OrderId, OrderStatus, PartnerId, SelectLimit, SelectOffset, UserId};

const ORDERS: &str = "rent-orders";
const OFFERS: &str = "rent-order-offers";

/// Eviction preference under memory pressure; `Low` goes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CachePriority {
    Low,
    Normal,
    High,
}

/// Semantic class of a cached query result. Drives TTL and eviction priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyClass {
    OrderById,
    ActiveOrder,
    OrdersByStatus(OrderStatus),
    AvailableOrders,
    OrderPage,
    OfferById,
    OffersByOrder,
    OffersByPartner,
}

impl KeyClass {
    pub fn ttl(&self) -> Duration {
        match self {
            KeyClass::ActiveOrder => Duration::from_secs(5),
            KeyClass::AvailableOrders | KeyClass::OffersByOrder | KeyClass::OffersByPartner => {
                Duration::from_secs(10)
            }
            KeyClass::OrdersByStatus(OrderStatus::Agreed) => Duration::from_secs(30),
            KeyClass::OrdersByStatus(OrderStatus::Completed | OrderStatus::Cancelled) => {
                Duration::from_secs(5 * 60)
            }
            KeyClass::OrdersByStatus(OrderStatus::AwaitingResponse | OrderStatus::HasOffers) => {
                Duration::from_secs(10)
            }
            KeyClass::OrderById | KeyClass::OfferById => Duration::from_secs(20),
            KeyClass::OrderPage => Duration::from_secs(2 * 60),
        }
    }

    pub fn priority(&self) -> CachePriority {
        match self {
            KeyClass::OrdersByStatus(status) if status.is_terminal() => CachePriority::High,
            KeyClass::AvailableOrders | KeyClass::OffersByOrder | KeyClass::OffersByPartner => {
                CachePriority::Low
            }
            _ => CachePriority::Normal,
        }
    }
}

/// `domain:scope:id[:status:value]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    raw: String,
    class: KeyClass,
}

impl CacheKey {
    fn new(raw: String, class: KeyClass) -> Self {
        Self { raw, class }
    }

    pub fn order_by_id(id: &OrderId) -> Self {
        Self::new(format!("{ORDERS}:id:{}", id.as_ref()), KeyClass::OrderById)
    }

    pub fn active_order_for_user(user_id: &UserId) -> Self {
        Self::new(
            format!("{ORDERS}:user:{}:active", user_id.as_ref()),
            KeyClass::ActiveOrder,
        )
    }

    pub fn orders_by_user(user_id: &UserId, status: &OrderStatus) -> Self {
        Self::new(
            format!("{ORDERS}:user:{}:status:{status}", user_id.as_ref()),
            KeyClass::OrdersByStatus(*status),
        )
    }

    pub fn orders_by_partner(partner_id: &PartnerId, status: &OrderStatus) -> Self {
        Self::new(
            format!("{ORDERS}:partner:{}:status:{status}", partner_id.as_ref()),
            KeyClass::OrdersByStatus(*status),
        )
    }

    pub fn available_orders_for_partner(partner_id: &PartnerId) -> Self {
        Self::new(
            format!("{ORDERS}:available:partner:{}", partner_id.as_ref()),
            KeyClass::AvailableOrders,
        )
    }

    pub fn order_page(limit: &SelectLimit, offset: &SelectOffset) -> Self {
        Self::new(
            format!("{ORDERS}:page:{}:{}", limit.as_ref(), offset.as_ref()),
            KeyClass::OrderPage,
        )
    }

    pub fn offer_by_id(id: &OfferId) -> Self {
        Self::new(format!("{OFFERS}:id:{}", id.as_ref()), KeyClass::OfferById)
    }

    pub fn offers_by_order(order_id: &OrderId) -> Self {
        Self::new(
            format!("{OFFERS}:order:{}", order_id.as_ref()),
            KeyClass::OffersByOrder,
        )
    }

    pub fn offers_by_partner(partner_id: &PartnerId) -> Self {
        Self::new(
            format!("{OFFERS}:partner:{}", partner_id.as_ref()),
            KeyClass::OffersByPartner,
        )
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn class(&self) -> KeyClass {
        self.class
    }

    pub fn ttl(&self) -> Duration {
        self.class.ttl()
    }

    pub fn priority(&self) -> CachePriority {
        self.class.priority()
    }

    pub fn starts_with(&self, prefix: &CachePrefix) -> bool {
        self.raw.starts_with(prefix.as_str())
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Always ends with `:` so that a prefix never captures a sibling id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CachePrefix(String);

impl CachePrefix {
    fn new(raw: String) -> Self {
        Self(raw)
    }

    /// Active order and every by-status listing of the renter.
    pub fn user_orders(user_id: &UserId) -> Self {
        Self::new(format!("{ORDERS}:user:{}:", user_id.as_ref()))
    }

    /// By-status listings of the renter, leaving the active order key alone.
    pub fn user_orders_by_status(user_id: &UserId) -> Self {
        Self::new(format!("{ORDERS}:user:{}:status:", user_id.as_ref()))
    }

    pub fn partner_orders(partner_id: &PartnerId) -> Self {
        Self::new(format!("{ORDERS}:partner:{}:", partner_id.as_ref()))
    }

    pub fn available_orders() -> Self {
        Self::new(format!("{ORDERS}:available:"))
    }

    pub fn order_pages() -> Self {
        Self::new(format!("{ORDERS}:page:"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CachePrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use uuid::Uuid;

    use crate::cache::{CacheKey, CachePrefix, CachePriority};
    use crate::entity::{OrderStatus, PartnerId, SelectLimit, SelectOffset, UserId};

    #[test]
    fn key_layout() {
        let user = Uuid::new_v4();
        let key = CacheKey::orders_by_user(&UserId::new(user), &OrderStatus::Agreed);
        assert_eq!(key.as_str(), format!("rent-orders:user:{user}:status:Agreed"));
        let page = CacheKey::order_page(&SelectLimit::default(), &SelectOffset::default());
        assert_eq!(page.as_str(), "rent-orders:page:30:0");
    }

    #[test]
    fn user_prefix_covers_active_and_status_keys() {
        let user_id = UserId::new(Uuid::new_v4());
        let prefix = CachePrefix::user_orders(&user_id);
        assert!(CacheKey::active_order_for_user(&user_id).starts_with(&prefix));
        assert!(CacheKey::orders_by_user(&user_id, &OrderStatus::HasOffers).starts_with(&prefix));

        let by_status = CachePrefix::user_orders_by_status(&user_id);
        assert!(!CacheKey::active_order_for_user(&user_id).starts_with(&by_status));
        assert!(CacheKey::orders_by_user(&user_id, &OrderStatus::Agreed).starts_with(&by_status));

        let other = UserId::new(Uuid::new_v4());
        assert!(!CacheKey::active_order_for_user(&other).starts_with(&prefix));
    }

    #[test]
    fn available_prefix_covers_every_partner() {
        let prefix = CachePrefix::available_orders();
        for _ in 0..3 {
            let partner = PartnerId::new(Uuid::new_v4());
            assert!(CacheKey::available_orders_for_partner(&partner).starts_with(&prefix));
            assert!(!CacheKey::orders_by_partner(&partner, &OrderStatus::Agreed).starts_with(&prefix));
        }
    }

    #[test]
    fn ttl_policy() {
        let user_id = UserId::new(Uuid::new_v4());
        let partner_id = PartnerId::new(Uuid::new_v4());
        assert_eq!(
            CacheKey::active_order_for_user(&user_id).ttl(),
            Duration::from_secs(5)
        );
        assert_eq!(
            CacheKey::available_orders_for_partner(&partner_id).ttl(),
            Duration::from_secs(10)
        );
        assert_eq!(
            CacheKey::orders_by_user(&user_id, &OrderStatus::Agreed).ttl(),
            Duration::from_secs(30)
        );
        assert_eq!(
            CacheKey::orders_by_partner(&partner_id, &OrderStatus::Completed).ttl(),
            Duration::from_secs(300)
        );
        assert_eq!(
            CacheKey::order_page(&SelectLimit::default(), &SelectOffset::default()).ttl(),
            Duration::from_secs(120)
        );
    }

    #[test]
    fn priority_policy() {
        let user_id = UserId::new(Uuid::new_v4());
        let partner_id = PartnerId::new(Uuid::new_v4());
        assert_eq!(
            CacheKey::orders_by_user(&user_id, &OrderStatus::Cancelled).priority(),
            CachePriority::High
        );
        assert_eq!(
            CacheKey::available_orders_for_partner(&partner_id).priority(),
            CachePriority::Low
        );
        assert_eq!(
            CacheKey::active_order_for_user(&user_id).priority(),
            CachePriority::Normal
        );
    }
}
