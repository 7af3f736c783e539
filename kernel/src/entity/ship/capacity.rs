use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct ShipCapacity(i32);

impl ShipCapacity {
    pub fn new(capacity: impl Into<i32>) -> Self {
        Self(capacity.into())
    }
}
