//! Checkout error types.

use folio_commerce::prelude::{CommerceError, PaymentMode};
use folio_data::ApiError;
use thiserror::Error;

use crate::notice::Notice;
use crate::provider::ProviderError;

/// Local validation failures. These never reach the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a shipping address.")]
    EmptyShippingAddress,

    #[error("Order total must be greater than zero to place an order.")]
    NonPositiveTotal,
}

/// Everything that can stop a checkout from producing an order.
#[derive(Error, Debug, Clone)]
pub enum CheckoutError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The cart total could not be computed.
    #[error("Cart total unavailable: {0}")]
    Cart(#[from] CommerceError),

    /// Card mode was asked to pay for an empty order.
    #[error("Cannot process payment for an empty or zero-total order.")]
    EmptyOrder,

    /// No payment intent could be obtained for the card form.
    #[error("Payment is not ready: {0}")]
    PaymentNotReady(String),

    /// The payment provider refused or failed to confirm.
    #[error("Payment failed: {0}")]
    Payment(#[from] ProviderError),

    /// Money was captured but the backend did not create the order.
    #[error("Payment {payment_intent_id} confirmed but order finalization failed: {source}")]
    CapturedNotFinalized {
        payment_intent_id: String,
        source: ApiError,
    },

    /// The backend rejected an order request.
    #[error("{mode} order rejected: {source}")]
    Backend { mode: PaymentMode, source: ApiError },

    /// The backend could not be reached.
    #[error("Checkout request failed: {0}")]
    Network(ApiError),
}

impl CheckoutError {
    /// Classify a backend failure from an order-placing call.
    pub(crate) fn from_api(mode: PaymentMode, err: ApiError) -> Self {
        if err.is_network() {
            CheckoutError::Network(err)
        } else {
            CheckoutError::Backend { mode, source: err }
        }
    }

    /// Whether payment may have been taken despite the failure.
    pub fn payment_captured(&self) -> bool {
        matches!(self, CheckoutError::CapturedNotFinalized { .. })
    }

    /// The message to show the shopper.
    pub fn notice(&self) -> Notice {
        match self {
            CheckoutError::Validation(e) => Notice::error(e.to_string()),
            CheckoutError::Cart(_) => {
                Notice::error("Your cart could not be totalled. Please refresh and try again.")
            }
            CheckoutError::EmptyOrder => Notice::error(self.to_string()),
            CheckoutError::PaymentNotReady(reason) => Notice::error(format!(
                "Could not initialize payment: {reason}. Please try again."
            )),
            CheckoutError::Payment(ProviderError::Cancelled) => {
                Notice::info("Payment was cancelled. You have not been charged.")
            }
            CheckoutError::Payment(ProviderError::Unavailable(_)) => Notice::error(
                "An unexpected error occurred during payment. Please try again.",
            ),
            CheckoutError::Payment(e) => Notice::error(e.to_string()),
            CheckoutError::CapturedNotFinalized { source, .. } => {
                let reason = source.reason();
                if reason.is_empty() {
                    Notice::error(
                        "Payment confirmed, but failed to finalize order. Please contact support.",
                    )
                } else {
                    Notice::error(format!(
                        "Payment confirmed, but failed to finalize order: {reason}. Please contact support."
                    ))
                }
            }
            CheckoutError::Backend { mode, source } => {
                let fallback = format!(
                    "Failed to place {} order. Please try again.",
                    mode.display_name()
                );
                Notice::error(source.reason_or(&fallback))
            }
            CheckoutError::Network(_) => {
                Notice::error("An unexpected error occurred. Please try again.")
            }
        }
    }
}
