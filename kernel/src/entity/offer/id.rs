use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct OfferId(Uuid);

impl OfferId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}
