mod offer;
mod order;

pub use self::{offer::*, order::*};
