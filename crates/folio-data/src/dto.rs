//! Request and response bodies for the backend endpoints.

use folio_commerce::prelude::{Book, BookId};
use folio_commerce::wire::major_units;
use folio_commerce::Money;
use serde::{Deserialize, Serialize};

/// Body for logging in.
#[derive(Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Response from a successful login.
#[derive(Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("LoginResponse { token: *** }")
    }
}

/// Book listing, either a bare array or wrapped as `{"books": [...]}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BookListResponse {
    Bare(Vec<Book>),
    Wrapped {
        #[serde(default, deserialize_with = "folio_commerce::wire::null_as_default")]
        books: Vec<Book>,
    },
}

impl BookListResponse {
    pub fn into_books(self) -> Vec<Book> {
        match self {
            BookListResponse::Bare(books) | BookListResponse::Wrapped { books } => books,
        }
    }
}

/// Body for adding to or updating a cart line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub book_id: BookId,
    pub quantity: u32,
}

/// Body for creating a card payment intent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePaymentIntentRequest {
    /// Amount in minor currency units.
    pub amount: i64,
}

/// Response from creating a card payment intent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentResponse {
    pub client_secret: String,
    #[serde(default)]
    pub payment_intent_id: Option<String>,
}

/// Body for finalizing an order after card confirmation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardCheckoutRequest {
    pub payment_intent_id: String,
    pub shipping_address: String,
    #[serde(with = "major_units")]
    pub total_amount: Money,
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
}

/// Body for a cash-on-delivery checkout.
///
/// Carries no line items: the backend rebuilds them from the server-side cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodCheckoutRequest {
    pub shipping_address: String,
    #[serde(with = "major_units")]
    pub total_amount: Money,
}

/// Body for a wallet checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletCheckoutRequest {
    pub shipping_address: String,
    pub payment_method: String,
    #[serde(with = "major_units")]
    pub total_amount: Money,
    pub payment_token: String,
}

/// Body for validating a promo code.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoValidationRequest {
    pub promo_code: String,
    #[serde(with = "major_units")]
    pub cart_total: Money,
}

/// Result of validating a promo code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoValidation {
    pub valid: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, with = "major_units::option")]
    pub discount: Option<Money>,
    #[serde(default, with = "major_units::option")]
    pub discounted_total: Option<Money>,
}
