//! HTTP client for the bookstore backend.

use std::sync::Arc;

use async_trait::async_trait;
use folio_commerce::prelude::{
    Book, BookId, BookQuery, Cart, ClientSecret, Money, Order, PaymentIntent,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::api::StoreApi;
use crate::credentials::TokenStore;
use crate::dto::{
    BookListResponse, CardCheckoutRequest, CartItemRequest, CodCheckoutRequest,
    CreatePaymentIntentRequest, CreatePaymentIntentResponse, LoginRequest, LoginResponse,
    PromoValidation, PromoValidationRequest, WalletCheckoutRequest,
};
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::retry::RetryPolicy;

/// Default API base url of a locally running backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// One backend call: the endpoint plus whatever varies per request.
struct Call {
    endpoint: Endpoint,
    path_suffix: Option<String>,
    query: Vec<(&'static str, String)>,
    body: Option<Value>,
}

impl Call {
    fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            path_suffix: None,
            query: Vec::new(),
            body: None,
        }
    }

    fn with_segment(mut self, segment: impl ToString) -> Self {
        self.path_suffix = Some(segment.to_string());
        self
    }

    fn with_query(mut self, query: Vec<(&'static str, String)>) -> Self {
        self.query = query;
        self
    }

    fn with_body<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encode {
            endpoint: self.endpoint.name(),
            reason: e.to_string(),
        })?;
        self.body = Some(value);
        Ok(self)
    }
}

/// Backend client.
///
/// Attaches the stored bearer token to every authenticated request, retries idempotent
/// reads per [`RetryPolicy::for_endpoint`], and normalizes failures into
/// [`ApiError`]. No timeout is imposed beyond the HTTP client's own.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl BackendClient {
    /// Create a new backend client.
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network {
                endpoint: "client",
                reason: e.to_string(),
            })?;
        Ok(Self::with_http_client(http, base_url, tokens))
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_http_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            tokens,
        }
    }

    /// Get the API base url.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, call: &Call) -> String {
        match &call.path_suffix {
            Some(segment) => format!("{}{}/{}", self.base_url, call.endpoint.path(), segment),
            None => format!("{}{}", self.base_url, call.endpoint.path()),
        }
    }

    async fn call<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ApiError> {
        self.execute(&Call::new(endpoint)).await
    }

    async fn call_with<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(&Call::new(endpoint).with_body(body)?).await
    }

    async fn execute<T: DeserializeOwned>(&self, call: &Call) -> Result<T, ApiError> {
        let endpoint = call.endpoint;
        let policy = RetryPolicy::for_endpoint(endpoint);
        let mut attempt = 0;
        loop {
            match self.send_once(call).await {
                Ok(value) => return Ok(value),
                Err(err) if policy.should_retry(&err, attempt) => {
                    let delay = policy.backoff.delay_for_attempt(attempt);
                    tracing::warn!(
                        endpoint = endpoint.name(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying backend call"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(&self, call: &Call) -> Result<T, ApiError> {
        let endpoint = call.endpoint;
        let mut request = self.http.request(endpoint.method(), self.url(call));

        if endpoint.requires_auth() {
            let token = self
                .tokens
                .load()
                .map_err(|e| ApiError::Credentials(e.to_string()))?;
            if let Some(token) = token {
                request = request.bearer_auth(token);
            }
        }
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let network = |e: reqwest::Error| ApiError::Network {
            endpoint: endpoint.name(),
            reason: e.to_string(),
        };

        let response = request.send().await.map_err(network)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(network)?;

        tracing::debug!(
            endpoint = endpoint.name(),
            status = status.as_u16(),
            bytes = bytes.len(),
            "backend call completed"
        );

        if !status.is_success() {
            return Err(ApiError::from_response(endpoint.name(), status.as_u16(), &bytes));
        }

        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
            endpoint: endpoint.name(),
            reason: e.to_string(),
        })
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl StoreApi for BackendClient {
    async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.call_with(Endpoint::Login, &request).await?;
        if response.token.trim().is_empty() {
            return Err(ApiError::Decode {
                endpoint: Endpoint::Login.name(),
                reason: "response carried an empty token".to_string(),
            });
        }
        Ok(response.token)
    }

    async fn list_books(&self, query: &BookQuery) -> Result<Vec<Book>, ApiError> {
        let call = Call::new(Endpoint::ListBooks).with_query(query.params());
        let response: Option<BookListResponse> = self.execute(&call).await?;
        Ok(response.map(BookListResponse::into_books).unwrap_or_default())
    }

    async fn get_cart(&self) -> Result<Cart, ApiError> {
        self.call(Endpoint::GetCart).await
    }

    async fn add_to_cart(&self, book_id: BookId, quantity: u32) -> Result<Cart, ApiError> {
        let request = CartItemRequest { book_id, quantity };
        self.call_with(Endpoint::AddToCart, &request).await
    }

    async fn update_cart_item(&self, book_id: BookId, quantity: u32) -> Result<Cart, ApiError> {
        let request = CartItemRequest { book_id, quantity };
        self.call_with(Endpoint::UpdateCartItem, &request).await
    }

    async fn remove_from_cart(&self, book_id: BookId) -> Result<Cart, ApiError> {
        let call = Call::new(Endpoint::RemoveFromCart).with_segment(book_id);
        self.execute(&call).await
    }

    async fn clear_cart(&self) -> Result<Cart, ApiError> {
        let cart: Option<Cart> = self.call(Endpoint::ClearCart).await?;
        Ok(cart.unwrap_or_default())
    }

    async fn order_history(&self) -> Result<Vec<Order>, ApiError> {
        let orders: Option<Vec<Order>> = self.call(Endpoint::OrderHistory).await?;
        Ok(orders.unwrap_or_default())
    }

    async fn create_payment_intent(&self, amount: Money) -> Result<PaymentIntent, ApiError> {
        let request = CreatePaymentIntentRequest {
            amount: amount.amount_minor,
        };
        let response: CreatePaymentIntentResponse = self
            .call_with(Endpoint::CreatePaymentIntent, &request)
            .await?;

        if response.client_secret.trim().is_empty() {
            return Err(ApiError::Decode {
                endpoint: Endpoint::CreatePaymentIntent.name(),
                reason: "response carried an empty client secret".to_string(),
            });
        }

        let intent = PaymentIntent::new(ClientSecret::new(response.client_secret), amount);
        Ok(match response.payment_intent_id {
            Some(id) => intent.with_id(id),
            None => intent,
        })
    }

    async fn finalize_card_payment(
        &self,
        request: &CardCheckoutRequest,
    ) -> Result<Order, ApiError> {
        self.call_with(Endpoint::FinalizeCardPayment, request).await
    }

    async fn checkout_cod(&self, request: &CodCheckoutRequest) -> Result<Order, ApiError> {
        self.call_with(Endpoint::CheckoutCod, request).await
    }

    async fn checkout_wallet(&self, request: &WalletCheckoutRequest) -> Result<Order, ApiError> {
        self.call_with(Endpoint::CheckoutWallet, request).await
    }

    async fn validate_promo(
        &self,
        code: &str,
        cart_total: Money,
    ) -> Result<PromoValidation, ApiError> {
        let request = PromoValidationRequest {
            promo_code: code.to_string(),
            cart_total,
        };
        self.call_with(Endpoint::ValidatePromo, &request).await
    }
}
