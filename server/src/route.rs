mod account;
mod offer;
mod order;

pub use self::{account::*, offer::*, order::*};
