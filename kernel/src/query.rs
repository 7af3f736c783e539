mod account;
mod offer;
mod order;
mod ship;

pub use self::{account::*, offer::*, order::*, ship::*};
