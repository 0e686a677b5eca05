//! The backend operations the storefront depends on.

use async_trait::async_trait;
use folio_commerce::prelude::{Book, BookId, BookQuery, Cart, Money, Order, PaymentIntent};

use crate::dto::{CardCheckoutRequest, CodCheckoutRequest, PromoValidation, WalletCheckoutRequest};
use crate::error::ApiError;

/// Backend catalogue, cart, order, and payment service.
///
/// [`BackendClient`](crate::BackendClient) implements this over HTTP; the
/// checkout flow only ever sees the trait.
#[async_trait]
pub trait StoreApi: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn login(&self, username: &str, password: &str) -> Result<String, ApiError>;

    /// List catalogue books matching `query`.
    async fn list_books(&self, query: &BookQuery) -> Result<Vec<Book>, ApiError>;

    /// Read the caller's cart.
    async fn get_cart(&self) -> Result<Cart, ApiError>;

    /// Add `quantity` copies of a book and return the updated cart.
    async fn add_to_cart(&self, book_id: BookId, quantity: u32) -> Result<Cart, ApiError>;

    /// Set the quantity of a book in the cart and return the updated cart.
    async fn update_cart_item(&self, book_id: BookId, quantity: u32) -> Result<Cart, ApiError>;

    /// Remove a book from the cart and return the updated cart.
    async fn remove_from_cart(&self, book_id: BookId) -> Result<Cart, ApiError>;

    /// Empty the caller's server-side cart and return it.
    async fn clear_cart(&self) -> Result<Cart, ApiError>;

    /// Read the caller's past orders.
    async fn order_history(&self) -> Result<Vec<Order>, ApiError>;

    /// Create a card payment intent for `amount`.
    async fn create_payment_intent(&self, amount: Money) -> Result<PaymentIntent, ApiError>;

    /// Turn a confirmed card payment into an order.
    async fn finalize_card_payment(&self, request: &CardCheckoutRequest)
        -> Result<Order, ApiError>;

    /// Place a cash-on-delivery order.
    async fn checkout_cod(&self, request: &CodCheckoutRequest) -> Result<Order, ApiError>;

    /// Place a wallet-paid order.
    async fn checkout_wallet(&self, request: &WalletCheckoutRequest) -> Result<Order, ApiError>;

    /// Check a promo code against a cart total.
    async fn validate_promo(&self, code: &str, cart_total: Money)
        -> Result<PromoValidation, ApiError>;
}
