//! Bookstore domain types for the Folio storefront.
//!
//! This crate holds the types the storefront moves between the backend and
//! the checkout flow:
//!
//! - **Catalog**: books listed by the backend and the filters to list them
//! - **Cart**: the server-side cart with book line items and a computed total
//! - **Checkout**: shipping address, payment modes, payment intents
//! - **Orders**: backend-created orders and the receipt built from them
//!
//! # Example
//!
//! ```rust
//! use folio_commerce::prelude::*;
//!
//! let cart: Cart = serde_json::from_str(
//!     r#"{"id": 7, "cartItems": [
//!         {"bookId": 1, "bookTitle": "Dune", "bookPrice": 9.99, "quantity": 2}
//!     ]}"#,
//! ).unwrap();
//!
//! let total = cart.total().unwrap();
//! assert_eq!(total.display(), "\u{00a3}19.98");
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod wire;

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money, STORE_CURRENCY};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money, STORE_CURRENCY};

    // Catalog
    pub use crate::catalog::{Book, BookQuery};

    // Cart
    pub use crate::cart::{Cart, LineItem};

    // Checkout
    pub use crate::checkout::{
        ClientSecret, Order, OrderItem, PaymentIntent, PaymentMode, Receipt, ReceiptLine,
        ShippingAddress,
    };
}
