mod cache;
pub mod lock;
pub mod service;
pub mod transfer;
