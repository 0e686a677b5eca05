//! Checkout module.
//!
//! Contains types for shipping addresses, payment modes, orders, and receipts.

mod address;
mod order;
mod payment;
mod receipt;

pub use address::ShippingAddress;
pub use order::{Order, OrderItem};
pub use payment::{ClientSecret, PaymentIntent, PaymentMode};
pub use receipt::{Receipt, ReceiptLine};
