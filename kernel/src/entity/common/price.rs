use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Amount in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct Price(i64);

impl Price {
    pub fn new(amount: impl Into<i64>) -> Self {
        Self(amount.into())
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}
