//! Backend endpoint catalogue.

use reqwest::Method;

/// Backend endpoints the storefront calls.
///
/// Each endpoint knows its method, path, and whether repeating it is safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Exchange username and password for a bearer token.
    Login,
    /// List catalogue books, optionally filtered.
    ListBooks,
    /// Read the caller's cart.
    GetCart,
    /// Add copies of a book to the cart.
    AddToCart,
    /// Set the quantity of a book already in the cart.
    UpdateCartItem,
    /// Remove a book from the cart. The book id is appended to the path.
    RemoveFromCart,
    /// Empty the caller's server-side cart.
    ClearCart,
    /// Read the caller's past orders.
    OrderHistory,
    /// Create a card payment intent.
    CreatePaymentIntent,
    /// Finalize an order after card confirmation.
    FinalizeCardPayment,
    /// Cash-on-delivery checkout.
    CheckoutCod,
    /// Wallet checkout.
    CheckoutWallet,
    /// Validate a promo code against a cart total.
    ValidatePromo,
}

impl Endpoint {
    /// HTTP method.
    pub fn method(&self) -> Method {
        match self {
            Self::ListBooks | Self::GetCart | Self::OrderHistory => Method::GET,
            Self::UpdateCartItem => Method::PUT,
            Self::RemoveFromCart | Self::ClearCart => Method::DELETE,
            Self::Login
            | Self::AddToCart
            | Self::CreatePaymentIntent
            | Self::FinalizeCardPayment
            | Self::CheckoutCod
            | Self::CheckoutWallet
            | Self::ValidatePromo => Method::POST,
        }
    }

    /// Path relative to the API base url.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/auth/login",
            Self::ListBooks => "/books",
            Self::GetCart => "/cart",
            Self::AddToCart => "/cart/add",
            Self::UpdateCartItem => "/cart/update",
            Self::RemoveFromCart => "/cart/remove",
            Self::ClearCart => "/cart/clear",
            Self::OrderHistory => "/orders",
            Self::CreatePaymentIntent => "/payment/create-payment-intent",
            Self::FinalizeCardPayment => "/payment/checkout/card",
            Self::CheckoutCod => "/payment/checkout/cod",
            Self::CheckoutWallet => "/payment/checkout/google-pay",
            Self::ValidatePromo => "/promos/validate",
        }
    }

    /// Whether repeating the call cannot create a second side effect.
    ///
    /// Checkout and payment calls are never idempotent: a repeat could
    /// place a second order for money that already moved.
    pub fn is_idempotent(&self) -> bool {
        matches!(
            self,
            Self::ListBooks
                | Self::GetCart
                | Self::UpdateCartItem
                | Self::RemoveFromCart
                | Self::OrderHistory
                | Self::ValidatePromo
        )
    }

    /// Get the default max retries for this endpoint.
    pub fn default_max_retries(&self) -> u32 {
        match self {
            Self::ListBooks | Self::GetCart | Self::OrderHistory => 2,
            _ => 0,
        }
    }

    /// Whether the call places or pays for an order.
    pub fn is_checkout(&self) -> bool {
        matches!(
            self,
            Self::FinalizeCardPayment | Self::CheckoutCod | Self::CheckoutWallet
        )
    }

    /// Whether the stored bearer token is attached.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login)
    }

    /// Get the name of this endpoint.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::ListBooks => "list_books",
            Self::GetCart => "get_cart",
            Self::AddToCart => "add_to_cart",
            Self::UpdateCartItem => "update_cart_item",
            Self::RemoveFromCart => "remove_from_cart",
            Self::ClearCart => "clear_cart",
            Self::OrderHistory => "order_history",
            Self::CreatePaymentIntent => "create_payment_intent",
            Self::FinalizeCardPayment => "finalize_card_payment",
            Self::CheckoutCod => "checkout_cod",
            Self::CheckoutWallet => "checkout_wallet",
            Self::ValidatePromo => "validate_promo",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
