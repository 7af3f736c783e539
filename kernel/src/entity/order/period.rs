use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References)]
pub struct RentalPeriod {
    #[serde(with = "time::serde::rfc3339")]
    start_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end_at: OffsetDateTime,
}

impl RentalPeriod {
    pub fn new(start_at: OffsetDateTime, end_at: OffsetDateTime) -> Self {
        Self { start_at, end_at }
    }

    pub fn is_valid(&self) -> bool {
        self.start_at < self.end_at
    }
}
