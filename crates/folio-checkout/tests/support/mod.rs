//! In-memory backend, providers and navigator for checkout tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use folio_checkout::{
    CartStore, CheckoutSession, Confirmation, IntentStatus, Navigator, OrderHistoryStore,
    PaymentProvider, ProviderError, Route, SimulatedWallet,
};
use folio_commerce::prelude::*;
use folio_data::{
    ApiError, CardCheckoutRequest, CodCheckoutRequest, PromoValidation, StoreApi,
    WalletCheckoutRequest,
};

/// Everything that crossed the backend or navigation seam, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Login(String),
    ListBooks(BookQuery),
    GetCart,
    AddToCart(BookId, u32),
    UpdateCartItem(BookId, u32),
    RemoveFromCart(BookId),
    ClearCart,
    OrderHistory,
    CreateIntent(Money),
    FinalizeCard(CardCheckoutRequest),
    Cod(CodCheckoutRequest),
    Wallet(WalletCheckoutRequest),
    ValidatePromo(String),
    Navigate(OrderId),
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

pub fn gbp(minor: i64) -> Money {
    Money::new(minor, STORE_CURRENCY)
}

pub fn line(book: i64, title: &str, price_minor: i64, quantity: u32) -> LineItem {
    LineItem {
        book_id: BookId::new(book),
        book_title: title.to_string(),
        book_image_url: None,
        book_price: gbp(price_minor),
        quantity,
    }
}

pub fn cart_of(items: Vec<LineItem>) -> Cart {
    Cart {
        id: Some(CartId::new(1)),
        user_id: Some(UserId::new(7)),
        items,
    }
}

pub fn server_error(endpoint: &'static str, reason: &str) -> ApiError {
    ApiError::Http {
        endpoint,
        status: 500,
        reason: reason.to_string(),
    }
}

/// Backend fake that builds orders from the server-side cart.
pub struct FakeBackend {
    pub events: EventLog,
    cart: Mutex<Cart>,
    orders: Mutex<Vec<Order>>,
    next_order_id: AtomicI64,
    pub intent_error: Mutex<Option<ApiError>>,
    pub finalize_error: Mutex<Option<ApiError>>,
    pub order_error: Mutex<Option<ApiError>>,
    pub clear_error: Mutex<Option<ApiError>>,
    pub edit_error: Mutex<Option<ApiError>>,
    pub history_error: Mutex<Option<ApiError>>,
    pub order_delay: Mutex<Duration>,
    pub intent_delay: Mutex<Duration>,
    /// Client secret to hand out instead of the generated `pi_{n}_secret_test`.
    pub intent_secret: Mutex<Option<String>>,
}

impl FakeBackend {
    pub fn new(events: EventLog, cart: Cart) -> Self {
        Self {
            events,
            cart: Mutex::new(cart),
            orders: Mutex::new(Vec::new()),
            next_order_id: AtomicI64::new(100),
            intent_error: Mutex::new(None),
            finalize_error: Mutex::new(None),
            order_error: Mutex::new(None),
            clear_error: Mutex::new(None),
            edit_error: Mutex::new(None),
            history_error: Mutex::new(None),
            order_delay: Mutex::new(Duration::ZERO),
            intent_delay: Mutex::new(Duration::ZERO),
            intent_secret: Mutex::new(None),
        }
    }

    pub fn set_cart(&self, cart: Cart) {
        *self.cart.lock().unwrap() = cart;
    }

    pub fn orders(&self) -> Vec<Order> {
        self.orders.lock().unwrap().clone()
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    /// Apply a cart edit unless an edit error is scripted.
    fn edit_cart(&self, edit: impl FnOnce(&mut Cart)) -> Result<Cart, ApiError> {
        if let Some(err) = self.edit_error.lock().unwrap().clone() {
            return Err(err);
        }
        let mut cart = self.cart.lock().unwrap();
        edit(&mut cart);
        Ok(cart.clone())
    }

    async fn create_order(
        &self,
        method: &str,
        address: &str,
        total: Money,
    ) -> Result<Order, ApiError> {
        let delay = *self.order_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = self.order_error.lock().unwrap().clone() {
            return Err(err);
        }
        let id = self.next_order_id.fetch_add(1, Ordering::SeqCst);
        let books = self
            .cart
            .lock()
            .unwrap()
            .items
            .iter()
            .map(|item| OrderItem {
                book_id: item.book_id,
                book_title: Some(item.book_title.clone()),
                quantity: item.quantity,
                price: Some(item.book_price),
            })
            .collect();
        let order = Order {
            id: OrderId::new(id),
            order_number: Some(format!("ORD-{id}")),
            order_date: None,
            total_amount: total,
            status: Some("PENDING".to_string()),
            payment_method: Some(method.to_string()),
            shipping_address: Some(address.to_string()),
            books,
        };
        self.orders.lock().unwrap().push(order.clone());
        Ok(order)
    }
}

#[async_trait]
impl StoreApi for FakeBackend {
    async fn login(&self, username: &str, _password: &str) -> Result<String, ApiError> {
        self.record(Event::Login(username.to_string()));
        Ok(format!("jwt-{username}"))
    }

    async fn list_books(&self, query: &BookQuery) -> Result<Vec<Book>, ApiError> {
        self.record(Event::ListBooks(query.clone()));
        Ok(Vec::new())
    }

    async fn get_cart(&self) -> Result<Cart, ApiError> {
        self.record(Event::GetCart);
        Ok(self.cart.lock().unwrap().clone())
    }

    async fn add_to_cart(&self, book_id: BookId, quantity: u32) -> Result<Cart, ApiError> {
        self.record(Event::AddToCart(book_id, quantity));
        self.edit_cart(|cart| {
            match cart.items.iter_mut().find(|item| item.book_id == book_id) {
                Some(item) => item.quantity += quantity,
                None => cart.items.push(line(
                    book_id.get(),
                    &format!("Book {book_id}"),
                    500,
                    quantity,
                )),
            }
        })
    }

    async fn update_cart_item(&self, book_id: BookId, quantity: u32) -> Result<Cart, ApiError> {
        self.record(Event::UpdateCartItem(book_id, quantity));
        self.edit_cart(|cart| {
            if let Some(item) = cart.items.iter_mut().find(|item| item.book_id == book_id) {
                item.quantity = quantity;
            }
        })
    }

    async fn remove_from_cart(&self, book_id: BookId) -> Result<Cart, ApiError> {
        self.record(Event::RemoveFromCart(book_id));
        self.edit_cart(|cart| cart.items.retain(|item| item.book_id != book_id))
    }

    async fn clear_cart(&self) -> Result<Cart, ApiError> {
        self.record(Event::ClearCart);
        if let Some(err) = self.clear_error.lock().unwrap().clone() {
            return Err(err);
        }
        let mut cart = self.cart.lock().unwrap();
        cart.items.clear();
        Ok(cart.clone())
    }

    async fn order_history(&self) -> Result<Vec<Order>, ApiError> {
        self.record(Event::OrderHistory);
        if let Some(err) = self.history_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.orders())
    }

    async fn create_payment_intent(&self, amount: Money) -> Result<PaymentIntent, ApiError> {
        self.record(Event::CreateIntent(amount));
        let n = self.events.lock().unwrap().len();
        let delay = *self.intent_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = self.intent_error.lock().unwrap().clone() {
            return Err(err);
        }
        let secret = self
            .intent_secret
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| format!("pi_{n}_secret_test"));
        Ok(PaymentIntent::new(ClientSecret::new(secret), amount))
    }

    async fn finalize_card_payment(
        &self,
        request: &CardCheckoutRequest,
    ) -> Result<Order, ApiError> {
        self.record(Event::FinalizeCard(request.clone()));
        if let Some(err) = self.finalize_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.create_order(
            &request.payment_method,
            &request.shipping_address,
            request.total_amount,
        )
        .await
    }

    async fn checkout_cod(&self, request: &CodCheckoutRequest) -> Result<Order, ApiError> {
        self.record(Event::Cod(request.clone()));
        self.create_order("COD", &request.shipping_address, request.total_amount)
            .await
    }

    async fn checkout_wallet(&self, request: &WalletCheckoutRequest) -> Result<Order, ApiError> {
        self.record(Event::Wallet(request.clone()));
        self.create_order(
            &request.payment_method,
            &request.shipping_address,
            request.total_amount,
        )
        .await
    }

    async fn validate_promo(
        &self,
        code: &str,
        cart_total: Money,
    ) -> Result<PromoValidation, ApiError> {
        self.record(Event::ValidatePromo(code.to_string()));
        Ok(PromoValidation {
            valid: false,
            message: Some("Unknown code".to_string()),
            discount: None,
            discounted_total: Some(cart_total),
        })
    }
}

/// Card provider returning a scripted result.
pub struct ScriptedCard {
    result: Mutex<Result<Confirmation, ProviderError>>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedCard {
    pub fn succeeding() -> Self {
        Self::with(Ok(Confirmation::new("", IntentStatus::Succeeded)))
    }

    pub fn with(result: Result<Confirmation, ProviderError>) -> Self {
        Self {
            result: Mutex::new(result),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentProvider for ScriptedCard {
    async fn collect_payment_details(
        &self,
        intent: &PaymentIntent,
    ) -> Result<Confirmation, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push(intent.client_secret.expose().to_string());
        self.result.lock().unwrap().clone()
    }
}

/// Navigator writing into the shared event log.
pub struct RecordingNavigator {
    events: EventLog,
    pub routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new(events: EventLog) -> Self {
        Self {
            events,
            routes: Mutex::new(Vec::new()),
        }
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        let Route::Receipt(order) = &route;
        self.events.lock().unwrap().push(Event::Navigate(order.id));
        self.routes.lock().unwrap().push(route);
    }
}

/// A wired-up session over the fakes.
pub struct Harness {
    pub events: EventLog,
    pub backend: Arc<FakeBackend>,
    pub cart: Arc<CartStore>,
    pub orders: Arc<OrderHistoryStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub card: Arc<ScriptedCard>,
    pub session: CheckoutSession,
}

impl Harness {
    /// Build a session and load `cart` into the cart store.
    pub async fn new(cart: Cart) -> Self {
        Self::with_card(cart, ScriptedCard::succeeding()).await
    }

    pub async fn with_card(cart: Cart, card: ScriptedCard) -> Self {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let backend = Arc::new(FakeBackend::new(events.clone(), cart));
        let api: Arc<dyn StoreApi> = backend.clone();
        let cart = Arc::new(CartStore::new(api.clone()));
        let orders = Arc::new(OrderHistoryStore::new(api.clone()));
        let navigator = Arc::new(RecordingNavigator::new(events.clone()));
        let card = Arc::new(card);

        cart.refresh().await.unwrap();

        let session = CheckoutSession::new(api, cart.clone(), orders.clone(), navigator.clone())
            .with_card_provider(card.clone())
            .with_wallet(Arc::new(SimulatedWallet::new(Duration::ZERO)));

        // Discard the initial cart load.
        events.lock().unwrap().clear();

        Self {
            events,
            backend,
            cart,
            orders,
            navigator,
            card,
            session,
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn navigations(&self) -> usize {
        self.navigator.routes.lock().unwrap().len()
    }
}
