//! Order types.

use crate::ids::{BookId, OrderId};
use crate::money::Money;
use crate::wire::{major_units, null_as_default};
use serde::{Deserialize, Serialize};

/// An order as created and returned by the backend.
///
/// The client never builds one of these itself; it only carries what the
/// backend sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Human-readable order number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    /// Order date as formatted by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,
    /// Total charged.
    #[serde(with = "major_units")]
    pub total_amount: Money,
    /// Backend order status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Payment method label.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Shipping address text.
    #[serde(default)]
    pub shipping_address: Option<String>,
    /// Books in the order.
    #[serde(default, alias = "orderItems", deserialize_with = "null_as_default")]
    pub books: Vec<OrderItem>,
}

impl Order {
    /// Order number, falling back to the id.
    pub fn reference(&self) -> String {
        match self.order_number.as_deref() {
            Some(number) if !number.is_empty() => number.to_string(),
            _ => self.id.to_string(),
        }
    }

    /// Get total item count.
    pub fn item_count(&self) -> u64 {
        self.books.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

/// A book line on an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Book purchased.
    pub book_id: BookId,
    /// Title at the time of purchase.
    #[serde(default)]
    pub book_title: Option<String>,
    /// Quantity.
    pub quantity: u32,
    /// Unit price at the time of purchase.
    #[serde(
        default,
        with = "major_units::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Money>,
}

impl OrderItem {
    /// Title, or a placeholder naming the book id.
    pub fn title(&self) -> String {
        self.book_title
            .clone()
            .unwrap_or_else(|| format!("Book #{}", self.book_id))
    }
}
