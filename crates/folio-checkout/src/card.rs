//! Card payment: intent lifecycle and confirmation.

use folio_commerce::prelude::{Money, Order, PaymentIntent, PaymentMode};
use folio_data::{CardCheckoutRequest, StoreApi};

use crate::error::CheckoutError;
use crate::provider::{IntentStatus, PaymentProvider};

/// State of the card payment form.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CardState {
    /// Nothing fetched yet, or the previous intent was discarded.
    #[default]
    Idle,
    /// The order total is zero; no intent will be requested.
    EmptyOrder,
    /// An intent exists for the current total.
    Ready(PaymentIntent),
    /// Requesting an intent failed.
    Unavailable { amount: Money, reason: String },
}

impl CardState {
    /// The intent, if one was created for exactly `total`.
    pub fn intent_for(&self, total: Money) -> Option<&PaymentIntent> {
        match self {
            CardState::Ready(intent) if intent.amount == total => Some(intent),
            _ => None,
        }
    }

    /// Whether this state still describes `total`.
    pub fn is_current_for(&self, total: Money) -> bool {
        match self {
            CardState::Idle | CardState::Unavailable { .. } => false,
            CardState::EmptyOrder => !total.is_positive(),
            CardState::Ready(intent) => intent.amount == total,
        }
    }

    /// Whether the card form can be submitted.
    pub fn is_ready(&self) -> bool {
        matches!(self, CardState::Ready(_))
    }
}

/// Request a payment intent for `total`.
///
/// A non-positive total never reaches the backend.
pub(crate) async fn fetch_intent(api: &dyn StoreApi, total: Money) -> CardState {
    if !total.is_positive() {
        return CardState::EmptyOrder;
    }
    match api.create_payment_intent(total).await {
        Ok(intent) => {
            tracing::debug!(amount = %total.display(), "payment intent created");
            CardState::Ready(intent)
        }
        Err(err) => {
            tracing::warn!(amount = %total.display(), error = %err, "payment intent request failed");
            CardState::Unavailable {
                amount: total,
                reason: err
                    .reason_or("the payment service could not be reached")
                    .to_string(),
            }
        }
    }
}

/// Order details carried into card finalization.
pub(crate) struct CardOrder {
    pub shipping_address: String,
    pub total: Money,
    pub promo_code: Option<String>,
}

pub(crate) enum CardOutcome {
    Placed(Order),
    Pending(IntentStatus),
}

/// Confirm `intent` with the provider, then finalize the order.
pub(crate) async fn pay(
    api: &dyn StoreApi,
    provider: &dyn PaymentProvider,
    intent: &PaymentIntent,
    order: CardOrder,
) -> Result<CardOutcome, CheckoutError> {
    // Finalization needs an intent id, so refuse before any money moves.
    let known_id = match intent.id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            tracing::warn!("payment intent has no id");
            return Err(CheckoutError::PaymentNotReady(
                "the payment intent has no id".to_string(),
            ));
        }
    };

    let confirmation = provider.collect_payment_details(intent).await?;

    if !confirmation.status.is_succeeded() {
        tracing::info!(status = %confirmation.status, "card payment not yet settled");
        return Ok(CardOutcome::Pending(confirmation.status));
    }

    let payment_intent_id = if confirmation.payment_intent_id.is_empty() {
        known_id
    } else {
        confirmation.payment_intent_id
    };

    let request = CardCheckoutRequest {
        payment_intent_id: payment_intent_id.clone(),
        shipping_address: order.shipping_address,
        total_amount: order.total,
        payment_method: PaymentMode::Card.label().to_string(),
        promo_code: order.promo_code,
    };

    match api.finalize_card_payment(&request).await {
        Ok(order) => Ok(CardOutcome::Placed(order)),
        Err(source) => {
            tracing::error!(
                payment_intent_id = %payment_intent_id,
                error = %source,
                "payment captured but order finalization failed"
            );
            Err(CheckoutError::CapturedNotFinalized {
                payment_intent_id,
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_commerce::prelude::{ClientSecret, STORE_CURRENCY};

    fn gbp(minor: i64) -> Money {
        Money::new(minor, STORE_CURRENCY)
    }

    #[test]
    fn test_intent_only_valid_for_its_amount() {
        let intent = PaymentIntent::new(ClientSecret::new("pi_1_secret_a"), gbp(1999));
        let state = CardState::Ready(intent);
        assert!(state.intent_for(gbp(1999)).is_some());
        assert!(state.intent_for(gbp(2999)).is_none());
        assert!(!state.is_current_for(gbp(2999)));
    }

    #[test]
    fn test_empty_order_state() {
        assert!(CardState::EmptyOrder.is_current_for(gbp(0)));
        assert!(!CardState::EmptyOrder.is_current_for(gbp(100)));
        assert!(!CardState::EmptyOrder.is_ready());
    }
}
