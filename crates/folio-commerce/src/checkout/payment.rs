//! Payment modes and card payment intents.

use crate::money::Money;
use crate::CommerceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the customer pays. Exactly one is selected at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMode {
    /// Credit/debit card through the hosted payment form.
    #[default]
    Card,
    /// Wallet payment (Google Pay).
    Wallet,
    /// Cash on delivery.
    CashOnDelivery,
}

impl PaymentMode {
    /// All modes in display order.
    pub const ALL: [PaymentMode; 3] = [
        PaymentMode::Card,
        PaymentMode::Wallet,
        PaymentMode::CashOnDelivery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Card => "card",
            PaymentMode::Wallet => "wallet",
            PaymentMode::CashOnDelivery => "cod",
        }
    }

    /// Payment method label recorded on the order by the backend.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMode::Card => "Credit Card",
            PaymentMode::Wallet => "Google Pay",
            PaymentMode::CashOnDelivery => "COD",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMode::Card => "Credit/Debit Card",
            PaymentMode::Wallet => "Google Pay",
            PaymentMode::CashOnDelivery => "Cash on Delivery",
        }
    }

    /// Whether the mode goes through a third-party payment confirmation.
    pub fn uses_payment_intent(&self) -> bool {
        matches!(self, PaymentMode::Card)
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for PaymentMode {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "card" | "credit-card" | "credit card" => Ok(PaymentMode::Card),
            "wallet" | "google-pay" | "googlepay" | "google pay" => Ok(PaymentMode::Wallet),
            "cod" | "cash-on-delivery" | "cash on delivery" => Ok(PaymentMode::CashOnDelivery),
            other => Err(CommerceError::UnknownPaymentMode(other.to_string())),
        }
    }
}

/// Client secret for a card payment intent.
///
/// Only ever held in memory for the active checkout. `Debug` output is
/// redacted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientSecret(String);

impl ClientSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Payment intent id embedded in the secret (`pi_123_secret_abc` -> `pi_123`).
    pub fn intent_id(&self) -> Option<&str> {
        self.0
            .split_once("_secret_")
            .map(|(id, _)| id)
            .filter(|id| !id.is_empty())
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(***)")
    }
}

/// A backend-created payment intent for a card payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntent {
    /// Intent id, when the backend reports it or it can be read off the secret.
    pub id: Option<String>,
    /// Secret handed to the payment provider.
    pub client_secret: ClientSecret,
    /// Amount the intent was created for.
    pub amount: Money,
}

impl PaymentIntent {
    pub fn new(client_secret: ClientSecret, amount: Money) -> Self {
        let id = client_secret.intent_id().map(str::to_string);
        Self {
            id,
            client_secret,
            amount,
        }
    }

    /// Override the intent id with the one the backend reported.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
