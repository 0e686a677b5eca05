//! Shopping cart module.
//!
//! The cart lives on the server; the client holds the last copy it read.

mod cart;

pub use cart::{Cart, LineItem};
