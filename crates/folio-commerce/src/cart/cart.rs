//! Cart and line item types.

use crate::error::CommerceError;
use crate::ids::{BookId, CartId, UserId};
use crate::money::{Money, STORE_CURRENCY};
use crate::wire::{major_units, null_as_default};
use serde::{Deserialize, Serialize};

/// A shopping cart as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Cart identifier.
    #[serde(default)]
    pub id: Option<CartId>,
    /// Owning user.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Items in the cart.
    #[serde(rename = "cartItems", default, deserialize_with = "null_as_default")]
    pub items: Vec<LineItem>,
}

impl Cart {
    /// An empty cart with no backend identity.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Get number of unique items.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Get an item by book ID.
    pub fn get_item(&self, book_id: BookId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.book_id == book_id)
    }

    /// Compute the cart total from its line items.
    ///
    /// The backend also reports a total, but it is not trusted: the total is
    /// always recomputed from unit price and quantity. An empty cart totals
    /// zero.
    pub fn total(&self) -> Result<Money, CommerceError> {
        let line_totals = self
            .items
            .iter()
            .map(LineItem::line_total)
            .collect::<Result<Vec<_>, _>>()?;
        Money::try_sum(line_totals.iter(), STORE_CURRENCY)
    }
}

/// A book in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Book being purchased.
    pub book_id: BookId,
    /// Book title at the time it was added.
    #[serde(default)]
    pub book_title: String,
    /// Cover image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_image_url: Option<String>,
    /// Unit price.
    #[serde(with = "major_units")]
    pub book_price: Money,
    /// Quantity.
    pub quantity: u32,
}

impl LineItem {
    /// Unit price times quantity.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        if self.quantity == 0 {
            return Err(CommerceError::InvalidQuantity(0));
        }
        self.book_price.try_multiply(i64::from(self.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(book: i64, price_minor: i64, quantity: u32) -> LineItem {
        LineItem {
            book_id: BookId::new(book),
            book_title: format!("Book {}", book),
            book_image_url: None,
            book_price: Money::new(price_minor, STORE_CURRENCY),
            quantity,
        }
    }

    #[test]
    fn test_empty_cart_totals_zero() {
        let cart = Cart::empty();
        assert!(cart.is_empty());
        assert!(cart.total().unwrap().is_zero());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_cart_total_from_items() {
        let cart = Cart {
            items: vec![item(1, 999, 2), item(2, 1250, 1)],
            ..Cart::default()
        };
        assert_eq!(cart.total().unwrap().amount_minor, 3248);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.unique_item_count(), 2);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let cart = Cart {
            items: vec![item(1, 999, 0)],
            ..Cart::default()
        };
        assert_eq!(cart.total(), Err(CommerceError::InvalidQuantity(0)));
    }

    #[test]
    fn test_cart_from_backend_json() {
        let json = r#"{
            "id": 3,
            "userId": 11,
            "cartItems": [
                {"bookId": 5, "bookTitle": "Emma", "bookImageUrl": null, "bookPrice": 7.5, "quantity": 2}
            ],
            "totalAmount": 15.0,
            "totalItems": 2
        }"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.id, Some(CartId::new(3)));
        assert_eq!(cart.get_item(BookId::new(5)).unwrap().book_title, "Emma");
        assert_eq!(cart.total().unwrap().amount_minor, 1500);
    }

    #[test]
    fn test_null_items_is_empty_cart() {
        let cart: Cart = serde_json::from_str(r#"{"id": 3, "cartItems": null}"#).unwrap();
        assert!(cart.is_empty());
    }
}
