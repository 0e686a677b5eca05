//! Checkout and payment orchestration for the Folio storefront.
//!
//! A [`CheckoutSession`] takes a shopper from payment-mode selection to a
//! placed order:
//!
//! - **Card**: fetch a payment intent, confirm through a [`PaymentProvider`],
//!   then finalize the order with the backend
//! - **Cash on delivery**: ask the backend for the order directly
//! - **Wallet**: confirm through a [`WalletProvider`], then ask the backend
//!
//! Every path validates the shipping address and total locally first, and
//! on success clears the cart, refreshes order history, and navigates to
//! the receipt. Failures become a [`Notice`] and leave the session usable.
//!
//! # Example
//!
//! ```rust,ignore
//! let cart = Arc::new(CartStore::new(api.clone()));
//! let orders = Arc::new(OrderHistoryStore::new(api.clone()));
//! cart.refresh().await?;
//!
//! let session = CheckoutSession::new(api, cart, orders, navigator)
//!     .with_card_provider(provider);
//! session.set_shipping_address("221B Baker Street").await;
//! session.select_mode(PaymentMode::CashOnDelivery).await;
//!
//! match session.submit().await {
//!     SubmitOutcome::Placed(order) => println!("placed {}", order.id),
//!     other => println!("{:?}", session.notice().await),
//! }
//! ```

mod card;
mod error;
mod navigation;
mod notice;
mod provider;
mod session;
mod store;

pub use card::CardState;
pub use error::{CheckoutError, ValidationError};
pub use navigation::{Navigator, Route};
pub use notice::{Notice, Severity};
pub use provider::{
    Confirmation, IntentStatus, PaymentProvider, ProviderError, SimulatedWallet,
    UnconfiguredCardProvider, WalletProvider, WalletToken, PLACEHOLDER_WALLET_TOKEN,
};
pub use session::{CheckoutSession, SubmitOutcome};
pub use store::{CartSnapshot, CartStore, OrderHistorySnapshot, OrderHistoryStore};
