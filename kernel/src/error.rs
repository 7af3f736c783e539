use std::fmt::Display;

use error_stack::Context;

use crate::entity::OrderStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    NotFound,
    InvalidOrderStatus,
    DuplicateOffer,
    ShipRequirementsNotMet,
    Conflict,
    InvalidInput,
    Timeout,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NotFound => write!(f, "Entity not found"),
            KernelError::InvalidOrderStatus => write!(f, "Order is not in the required status"),
            KernelError::DuplicateOffer => write!(f, "Partner already has a pending offer"),
            KernelError::ShipRequirementsNotMet => {
                write!(f, "Ship does not satisfy the order requirements")
            }
            KernelError::Conflict => write!(f, "Offer is already resolved"),
            KernelError::InvalidInput => write!(f, "Invalid input"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}

/// Attached to [`KernelError::InvalidOrderStatus`] reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMismatch {
    pub current: OrderStatus,
    pub required: Vec<OrderStatus>,
}

impl StatusMismatch {
    pub fn new(current: OrderStatus, required: impl Into<Vec<OrderStatus>>) -> Self {
        Self {
            current,
            required: required.into(),
        }
    }
}

impl Display for StatusMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let required = self
            .required
            .iter()
            .map(OrderStatus::as_str)
            .collect::<Vec<_>>()
            .join(" | ");
        write!(f, "current status: {}, required: {required}", self.current)
    }
}
