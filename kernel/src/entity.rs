mod common;
mod offer;
mod order;
mod partner;
mod port;
mod ship;
mod user;

pub use self::{common::*, offer::*, order::*, partner::*, port::*, ship::*, user::*};
