//! Checkout session state machine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use folio_commerce::prelude::{Money, Order, PaymentMode, Receipt, ShippingAddress};
use folio_data::{CodCheckoutRequest, StoreApi, WalletCheckoutRequest};
use tokio::sync::Mutex;

use crate::card::{self, CardOrder, CardOutcome, CardState};
use crate::error::{CheckoutError, ValidationError};
use crate::navigation::{Navigator, Route};
use crate::notice::Notice;
use crate::provider::{
    IntentStatus, PaymentProvider, SimulatedWallet, UnconfiguredCardProvider, WalletProvider,
};
use crate::store::{CartStore, OrderHistoryStore};

/// Result of a submit attempt.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The backend created the order; the shopper was sent to the receipt.
    Placed(Order),
    /// The card payment was accepted but has not settled yet.
    Pending(IntentStatus),
    /// Nothing was ordered.
    Failed(CheckoutError),
    /// Another submit is still running; this one was ignored.
    InFlight,
}

impl SubmitOutcome {
    pub fn order(&self) -> Option<&Order> {
        match self {
            SubmitOutcome::Placed(order) => Some(order),
            _ => None,
        }
    }

    /// Receipt for the placed order.
    pub fn receipt(&self) -> Option<Receipt> {
        self.order().map(Receipt::from_order)
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, SubmitOutcome::Placed(_))
    }
}

#[derive(Debug, Default)]
struct SessionState {
    mode: PaymentMode,
    shipping_address: String,
    promo_code: Option<String>,
    card: CardState,
    /// Bumped whenever card state is discarded; late intent fetches from an
    /// older epoch are dropped.
    card_epoch: u64,
    notice: Option<Notice>,
}

impl SessionState {
    fn reset_card(&mut self) {
        self.card = CardState::Idle;
        self.card_epoch += 1;
    }
}

/// Clears the in-flight flag when a submit ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

enum Placement {
    Placed(Order),
    Pending(IntentStatus),
}

/// One shopper's checkout.
///
/// Holds the selected payment mode, the shipping address and promo code
/// being edited, and the card form state. [`submit`](Self::submit) runs
/// the flow for the selected mode.
pub struct CheckoutSession {
    api: Arc<dyn StoreApi>,
    cart: Arc<CartStore>,
    orders: Arc<OrderHistoryStore>,
    navigator: Arc<dyn Navigator>,
    card_provider: Arc<dyn PaymentProvider>,
    wallet: Arc<dyn WalletProvider>,
    state: Mutex<SessionState>,
    submitting: AtomicBool,
}

impl CheckoutSession {
    /// Create a session in card mode with no card provider and a simulated
    /// wallet.
    pub fn new(
        api: Arc<dyn StoreApi>,
        cart: Arc<CartStore>,
        orders: Arc<OrderHistoryStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            cart,
            orders,
            navigator,
            card_provider: Arc::new(UnconfiguredCardProvider),
            wallet: Arc::new(SimulatedWallet::default()),
            state: Mutex::new(SessionState::default()),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn with_card_provider(mut self, provider: Arc<dyn PaymentProvider>) -> Self {
        self.card_provider = provider;
        self
    }

    pub fn with_wallet(mut self, wallet: Arc<dyn WalletProvider>) -> Self {
        self.wallet = wallet;
        self
    }

    pub async fn mode(&self) -> PaymentMode {
        self.state.lock().await.mode
    }

    /// Switch payment mode.
    ///
    /// Any card intent and notice belong to the previous mode and are
    /// discarded.
    pub async fn select_mode(&self, mode: PaymentMode) {
        let mut state = self.state.lock().await;
        if state.mode == mode {
            return;
        }
        tracing::debug!(from = state.mode.as_str(), to = mode.as_str(), "payment mode changed");
        state.mode = mode;
        state.reset_card();
        state.notice = None;
    }

    pub async fn set_shipping_address(&self, address: impl Into<String>) {
        self.state.lock().await.shipping_address = address.into();
    }

    pub async fn shipping_address(&self) -> String {
        self.state.lock().await.shipping_address.clone()
    }

    /// Set the promo code sent with card orders. Blank clears it.
    pub async fn set_promo_code(&self, code: Option<String>) {
        let code = code
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        self.state.lock().await.promo_code = code;
    }

    pub async fn promo_code(&self) -> Option<String> {
        self.state.lock().await.promo_code.clone()
    }

    pub async fn card_state(&self) -> CardState {
        self.state.lock().await.card.clone()
    }

    /// The message currently shown to the shopper.
    pub async fn notice(&self) -> Option<Notice> {
        self.state.lock().await.notice.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Whether the submit control should be enabled.
    pub async fn can_submit(&self) -> bool {
        if self.is_submitting() {
            return false;
        }
        let total = match self.cart.total().await {
            Ok(total) => total,
            Err(_) => return false,
        };
        let state = self.state.lock().await;
        if !total.is_positive() || ShippingAddress::is_blank(&state.shipping_address) {
            return false;
        }
        match state.mode {
            PaymentMode::Card => state.card.intent_for(total).is_some(),
            PaymentMode::Wallet | PaymentMode::CashOnDelivery => true,
        }
    }

    /// Bring the card form up to date with the cart total.
    ///
    /// Requests a new payment intent when the total is positive and differs
    /// from the one the current intent was created for. Does nothing outside
    /// card mode.
    pub async fn sync_payment_intent(&self) -> CardState {
        let total = match self.cart.total().await {
            Ok(total) => total,
            Err(err) => {
                tracing::warn!(error = %err, "cannot total cart for payment intent");
                return self.card_state().await;
            }
        };

        let epoch = {
            let state = self.state.lock().await;
            if state.mode != PaymentMode::Card || state.card.is_current_for(total) {
                return state.card.clone();
            }
            state.card_epoch
        };

        let fetched = card::fetch_intent(self.api.as_ref(), total).await;

        let mut state = self.state.lock().await;
        if state.card_epoch != epoch || state.mode != PaymentMode::Card {
            tracing::debug!("discarding payment intent fetched for a stale card form");
            return state.card.clone();
        }
        if let CardState::Unavailable { reason, .. } = &fetched {
            state.notice = Some(CheckoutError::PaymentNotReady(reason.clone()).notice());
        }
        state.card = fetched;
        state.card.clone()
    }

    /// Place the order using the selected payment mode.
    ///
    /// Only one submit runs at a time; overlapping calls return
    /// [`SubmitOutcome::InFlight`] without side effects.
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.submitting) else {
            tracing::debug!("checkout already in progress");
            return SubmitOutcome::InFlight;
        };

        let mode = {
            let mut state = self.state.lock().await;
            state.notice = None;
            state.mode
        };

        match self.place_order(mode).await {
            Ok(Placement::Placed(order)) => self.complete(mode, order).await,
            Ok(Placement::Pending(status)) => {
                let notice = Notice::warning(format!(
                    "Payment is {status}. It might take a moment to finalize."
                ));
                self.state.lock().await.notice = Some(notice);
                SubmitOutcome::Pending(status)
            }
            Err(err) => {
                tracing::warn!(mode = mode.as_str(), error = %err, "checkout failed");
                self.state.lock().await.notice = Some(err.notice());
                SubmitOutcome::Failed(err)
            }
        }
    }

    async fn place_order(&self, mode: PaymentMode) -> Result<Placement, CheckoutError> {
        let (address, promo_code) = {
            let state = self.state.lock().await;
            (state.shipping_address.clone(), state.promo_code.clone())
        };
        let total = self.cart.total().await?;
        let address = validate(mode, &address, total)?;

        tracing::info!(mode = mode.as_str(), total = %total.display(), "placing order");

        match mode {
            PaymentMode::Card => self.pay_by_card(address, total, promo_code).await,
            PaymentMode::CashOnDelivery => {
                let request = CodCheckoutRequest {
                    shipping_address: address.as_str().to_string(),
                    total_amount: total,
                };
                self.api
                    .checkout_cod(&request)
                    .await
                    .map(Placement::Placed)
                    .map_err(|e| CheckoutError::from_api(mode, e))
            }
            PaymentMode::Wallet => {
                let token = self.wallet.request_token(total).await?;
                let request = WalletCheckoutRequest {
                    shipping_address: address.as_str().to_string(),
                    payment_method: mode.label().to_string(),
                    total_amount: total,
                    payment_token: token.expose().to_string(),
                };
                self.api
                    .checkout_wallet(&request)
                    .await
                    .map(Placement::Placed)
                    .map_err(|e| CheckoutError::from_api(mode, e))
            }
        }
    }

    async fn pay_by_card(
        &self,
        address: ShippingAddress,
        total: Money,
        promo_code: Option<String>,
    ) -> Result<Placement, CheckoutError> {
        let cached = self.state.lock().await.card.intent_for(total).cloned();
        let intent = match cached {
            Some(intent) => intent,
            None => match self.sync_payment_intent().await {
                CardState::Ready(intent) if intent.amount == total => intent,
                CardState::EmptyOrder => return Err(CheckoutError::EmptyOrder),
                CardState::Unavailable { reason, .. } => {
                    return Err(CheckoutError::PaymentNotReady(reason))
                }
                _ => {
                    return Err(CheckoutError::PaymentNotReady(
                        "the card form changed during checkout".to_string(),
                    ))
                }
            },
        };

        let order = CardOrder {
            shipping_address: address.as_str().to_string(),
            total,
            promo_code,
        };
        match card::pay(self.api.as_ref(), self.card_provider.as_ref(), &intent, order).await? {
            CardOutcome::Placed(order) => Ok(Placement::Placed(order)),
            CardOutcome::Pending(status) => Ok(Placement::Pending(status)),
        }
    }

    /// Post-order bookkeeping: clear the cart, then refresh history, then
    /// show the receipt. Failures of the first two are logged only.
    async fn complete(&self, mode: PaymentMode, order: Order) -> SubmitOutcome {
        tracing::info!(
            mode = mode.as_str(),
            order_id = %order.id,
            total = %order.total_amount.display(),
            "order placed"
        );

        if let Err(err) = self.cart.clear().await {
            tracing::warn!(error = %err, "failed to clear cart after order");
        }
        if let Err(err) = self.orders.refresh().await {
            tracing::warn!(error = %err, "failed to refresh order history after order");
        }

        {
            let mut state = self.state.lock().await;
            state.reset_card();
            state.promo_code = None;
            state.notice = Some(Notice::success(format!(
                "Order placed successfully with {}! Order No: {}",
                mode.display_name(),
                order.reference()
            )));
        }

        self.navigator.navigate(Route::Receipt(order.clone()));
        SubmitOutcome::Placed(order)
    }
}

impl std::fmt::Debug for CheckoutSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutSession")
            .field("submitting", &self.is_submitting())
            .finish_non_exhaustive()
    }
}

/// Local checks run before any request is made.
fn validate(
    mode: PaymentMode,
    address: &str,
    total: Money,
) -> Result<ShippingAddress, CheckoutError> {
    if !total.is_positive() {
        return Err(match mode {
            PaymentMode::Card => CheckoutError::EmptyOrder,
            _ => ValidationError::NonPositiveTotal.into(),
        });
    }
    ShippingAddress::parse(address).map_err(|_| ValidationError::EmptyShippingAddress.into())
}
