//! Third-party payment seams.
//!
//! Card details and wallet tokens never pass through the storefront. A
//! [`PaymentProvider`] confirms a card payment against a client secret and
//! reports the resulting intent; a [`WalletProvider`] produces a payment
//! token for the wallet checkout.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use folio_commerce::prelude::{Money, PaymentIntent};
use thiserror::Error;

/// Token sent by [`SimulatedWallet`] in place of a real wallet token.
pub const PLACEHOLDER_WALLET_TOKEN: &str = "google-pay-token-12345";

/// Errors reported by a payment provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The submitted payment details were rejected before confirmation.
    #[error("{0}")]
    Submission(String),

    /// The issuer declined the payment.
    #[error("{0}")]
    Declined(String),

    /// The shopper abandoned the payment.
    #[error("Payment was cancelled")]
    Cancelled,

    /// The provider could not be reached or misbehaved.
    #[error("Payment provider unavailable: {0}")]
    Unavailable(String),
}

/// Payment intent status reported after confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentStatus {
    Succeeded,
    Processing,
    RequiresAction,
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresCapture,
    Canceled,
    Other(String),
}

impl IntentStatus {
    /// Parse a provider status string. Unknown values are kept verbatim.
    pub fn parse(status: &str) -> Self {
        match status.trim() {
            "succeeded" => IntentStatus::Succeeded,
            "processing" => IntentStatus::Processing,
            "requires_action" => IntentStatus::RequiresAction,
            "requires_payment_method" => IntentStatus::RequiresPaymentMethod,
            "requires_confirmation" => IntentStatus::RequiresConfirmation,
            "requires_capture" => IntentStatus::RequiresCapture,
            "canceled" => IntentStatus::Canceled,
            other => IntentStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            IntentStatus::Succeeded => "succeeded",
            IntentStatus::Processing => "processing",
            IntentStatus::RequiresAction => "requires_action",
            IntentStatus::RequiresPaymentMethod => "requires_payment_method",
            IntentStatus::RequiresConfirmation => "requires_confirmation",
            IntentStatus::RequiresCapture => "requires_capture",
            IntentStatus::Canceled => "canceled",
            IntentStatus::Other(s) => s,
        }
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, IntentStatus::Succeeded)
    }
}

impl fmt::Display for IntentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a provider confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub payment_intent_id: String,
    pub status: IntentStatus,
}

impl Confirmation {
    pub fn new(payment_intent_id: impl Into<String>, status: IntentStatus) -> Self {
        Self {
            payment_intent_id: payment_intent_id.into(),
            status,
        }
    }

    pub fn succeeded(payment_intent_id: impl Into<String>) -> Self {
        Self::new(payment_intent_id, IntentStatus::Succeeded)
    }
}

/// Collects card details and confirms a payment intent.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Collect payment details for `intent` and confirm it.
    async fn collect_payment_details(
        &self,
        intent: &PaymentIntent,
    ) -> Result<Confirmation, ProviderError>;
}

/// Card provider used when none is configured. Always unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredCardProvider;

#[async_trait]
impl PaymentProvider for UnconfiguredCardProvider {
    async fn collect_payment_details(
        &self,
        _intent: &PaymentIntent,
    ) -> Result<Confirmation, ProviderError> {
        Err(ProviderError::Unavailable(
            "no card payment provider configured".to_string(),
        ))
    }
}

/// An opaque wallet payment token.
#[derive(Clone, PartialEq, Eq)]
pub struct WalletToken(String);

impl WalletToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for WalletToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WalletToken(<redacted>)")
    }
}

/// Produces a wallet payment token for an amount.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn request_token(&self, amount: Money) -> Result<WalletToken, ProviderError>;
}

/// Wallet that approves every request with a fixed token after a short delay.
#[derive(Debug, Clone)]
pub struct SimulatedWallet {
    delay: Duration,
    token: String,
}

impl SimulatedWallet {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            token: PLACEHOLDER_WALLET_TOKEN.to_string(),
        }
    }

    /// Use a different token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }
}

impl Default for SimulatedWallet {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500))
    }
}

#[async_trait]
impl WalletProvider for SimulatedWallet {
    async fn request_token(&self, amount: Money) -> Result<WalletToken, ProviderError> {
        tracing::debug!(
            amount = %amount.display(),
            delay_ms = self.delay.as_millis() as u64,
            "simulating wallet approval"
        );
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(WalletToken::new(self.token.clone()))
    }
}
