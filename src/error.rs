//! Error types surfaced by the service layer

use crate::order::OrderStatus;

/// Input validation failures. Nothing is written when one of these comes
/// back.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("quantity must be greater than zero")]
    ZeroQuantity,
    #[error("product name must not be empty")]
    MissingName,
    #[error("product price must be set")]
    MissingPrice,
    #[error("product price must be greater than zero")]
    NonPositivePrice,
    #[error("unknown order status: {0}")]
    UnknownStatus(String),
}

/// A reservation would take a product's stock below zero.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("insufficient stock for {name}: requested {requested}, available {available}")]
pub struct InsufficientStock {
    pub name: String,
    pub requested: u32,
    pub available: u32,
}

/// Operation failures reported to callers of the service surface.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CommerceError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("no cart exists for user {0}")]
    CartNotFound(String),
    #[error("product {0} is not in the cart")]
    NotInCart(String),
    #[error("product {0} not found")]
    ProductNotFound(String),
    #[error("order {0} not found")]
    OrderNotFound(String),
    #[error("user {0} not found")]
    UserNotFound(String),
    #[error("not authorized to access order {0}")]
    Forbidden(String),
    #[error("only pending orders can be cancelled, order is {0}")]
    NotCancellable(OrderStatus),
    /// Raised after the triggering cancellation has already committed. The
    /// cancellation stands, the caller is told to stop.
    #[error("account suspended after {0} order cancellations")]
    AccountSuspended(u32),
}

/// Store level failures. Surfaced as opaque internal errors.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("stored record {0} could not be decoded")]
    Corrupt(String),
}
