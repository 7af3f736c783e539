use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct PassengerCount(i32);

impl PassengerCount {
    pub fn new(count: impl Into<i32>) -> Self {
        Self(count.into())
    }
}
