//! Shared cart and order-history state.
//!
//! Both stores wrap a [`StoreApi`] and keep the last loaded value plus the
//! last failure, so views can render from a snapshot without issuing
//! requests of their own.

use std::sync::Arc;

use folio_commerce::prelude::{BookId, Cart, CommerceError, LineItem, Money, Order};
use folio_data::{ApiError, StoreApi};
use tokio::sync::RwLock;

/// Point-in-time view of the cart.
#[derive(Debug, Clone, Default)]
pub struct CartSnapshot {
    pub cart: Cart,
    /// Whether a load has ever completed.
    pub loaded: bool,
    pub last_error: Option<ApiError>,
}

/// The shopper's cart as last seen from the backend.
pub struct CartStore {
    api: Arc<dyn StoreApi>,
    state: RwLock<CartSnapshot>,
}

impl CartStore {
    pub fn new(api: Arc<dyn StoreApi>) -> Self {
        Self {
            api,
            state: RwLock::new(CartSnapshot::default()),
        }
    }

    /// Reload the cart from the backend.
    ///
    /// On failure the previous cart is kept and the error recorded.
    pub async fn refresh(&self) -> Result<Cart, ApiError> {
        let result = self.api.get_cart().await;
        let mut state = self.state.write().await;
        match result {
            Ok(cart) => {
                state.cart = cart.clone();
                state.loaded = true;
                state.last_error = None;
                Ok(cart)
            }
            Err(err) => {
                tracing::warn!(error = %err, "cart refresh failed");
                state.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Add copies of a book. Quantity must be at least one.
    pub async fn add(&self, book_id: BookId, quantity: u32) -> Result<Cart, ApiError> {
        tracing::debug!(book_id = %book_id, quantity, "adding to cart");
        let result = self.api.add_to_cart(book_id, quantity).await;
        self.apply(result).await
    }

    /// Set the quantity of a book already in the cart.
    pub async fn update_quantity(&self, book_id: BookId, quantity: u32) -> Result<Cart, ApiError> {
        tracing::debug!(book_id = %book_id, quantity, "updating cart quantity");
        let result = self.api.update_cart_item(book_id, quantity).await;
        self.apply(result).await
    }

    /// Remove a book from the cart.
    pub async fn remove(&self, book_id: BookId) -> Result<Cart, ApiError> {
        tracing::debug!(book_id = %book_id, "removing from cart");
        let result = self.api.remove_from_cart(book_id).await;
        self.apply(result).await
    }

    /// Take the cart a cart-editing call returned. A failed edit leaves the
    /// local cart as it was.
    async fn apply(&self, result: Result<Cart, ApiError>) -> Result<Cart, ApiError> {
        let mut state = self.state.write().await;
        match result {
            Ok(cart) => {
                state.cart = cart.clone();
                state.loaded = true;
                state.last_error = None;
                Ok(cart)
            }
            Err(err) => {
                tracing::warn!(error = %err, "cart update failed");
                state.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Empty the cart on the backend.
    ///
    /// The local copy is emptied even when the request fails, so a cart
    /// that was just ordered is never shown again.
    pub async fn clear(&self) -> Result<(), ApiError> {
        let result = self.api.clear_cart().await;
        let mut state = self.state.write().await;
        match result {
            Ok(cart) => {
                state.cart = cart;
                state.last_error = None;
                Ok(())
            }
            Err(err) => {
                state.cart = Cart::empty();
                state.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Replace the local cart, e.g. after another view changed it.
    pub async fn set(&self, cart: Cart) {
        let mut state = self.state.write().await;
        state.cart = cart;
        state.loaded = true;
    }

    pub async fn snapshot(&self) -> CartSnapshot {
        self.state.read().await.clone()
    }

    pub async fn items(&self) -> Vec<LineItem> {
        self.state.read().await.cart.items.clone()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.cart.is_empty()
    }

    /// Sum of line totals. Zero for an empty or unloaded cart.
    pub async fn total(&self) -> Result<Money, CommerceError> {
        self.state.read().await.cart.total()
    }
}

/// Point-in-time view of the order history.
#[derive(Debug, Clone, Default)]
pub struct OrderHistorySnapshot {
    pub orders: Vec<Order>,
    pub last_error: Option<ApiError>,
}

/// The shopper's past orders.
pub struct OrderHistoryStore {
    api: Arc<dyn StoreApi>,
    state: RwLock<OrderHistorySnapshot>,
}

impl OrderHistoryStore {
    pub fn new(api: Arc<dyn StoreApi>) -> Self {
        Self {
            api,
            state: RwLock::new(OrderHistorySnapshot::default()),
        }
    }

    /// Reload the order history.
    ///
    /// A failed load empties the list rather than showing stale orders.
    pub async fn refresh(&self) -> Result<Vec<Order>, ApiError> {
        let result = self.api.order_history().await;
        let mut state = self.state.write().await;
        match result {
            Ok(orders) => {
                state.orders = orders.clone();
                state.last_error = None;
                Ok(orders)
            }
            Err(err) => {
                tracing::warn!(error = %err, "order history refresh failed");
                state.orders.clear();
                state.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.state.read().await.orders.clone()
    }

    pub async fn snapshot(&self) -> OrderHistorySnapshot {
        self.state.read().await.clone()
    }
}
