use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum OrderStatus {
    AwaitingResponse,
    HasOffers,
    Agreed,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ACCEPTING_OFFERS: [OrderStatus; 2] =
        [OrderStatus::AwaitingResponse, OrderStatus::HasOffers];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::AwaitingResponse => "AwaitingResponse",
            OrderStatus::HasOffers => "HasOffers",
            OrderStatus::Agreed => "Agreed",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn accepts_offers(&self) -> bool {
        Self::ACCEPTING_OFFERS.contains(self)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AwaitingResponse" => Ok(OrderStatus::AwaitingResponse),
            "HasOffers" => Ok(OrderStatus::HasOffers),
            "Agreed" => Ok(OrderStatus::Agreed),
            "Completed" => Ok(OrderStatus::Completed),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl Display for UnknownStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown status `{}`", self.0)
    }
}
