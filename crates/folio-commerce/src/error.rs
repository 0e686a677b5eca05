//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront domain operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Shipping address missing or whitespace only.
    #[error("Shipping address is required")]
    EmptyShippingAddress,

    /// Order total is zero or negative.
    #[error("Order total must be greater than zero, got {0}")]
    NonPositiveTotal(String),

    /// Unrecognised payment mode name.
    #[error("Unknown payment mode: {0}")]
    UnknownPaymentMode(String),
}
