mod operation;
mod price;
mod time;

pub use self::{operation::*, price::*, time::*};
