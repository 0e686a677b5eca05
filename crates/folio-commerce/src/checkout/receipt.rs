//! Receipt view model.

use crate::checkout::Order;
use crate::money::Money;
use serde::Serialize;

/// What the receipt view shows for a placed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub order_number: String,
    pub total: Money,
    pub payment_method: String,
    pub shipping_address: String,
    pub items: Vec<ReceiptLine>,
}

/// One `(book, quantity)` line on a receipt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptLine {
    pub title: String,
    pub quantity: u32,
}

impl Receipt {
    /// Build a receipt from the order exactly as the backend returned it.
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_number: order.reference(),
            total: order.total_amount,
            payment_method: order.payment_method.clone().unwrap_or_default(),
            shipping_address: order.shipping_address.clone().unwrap_or_default(),
            items: order
                .books
                .iter()
                .map(|item| ReceiptLine {
                    title: item.title(),
                    quantity: item.quantity,
                })
                .collect(),
        }
    }

    /// Render as display lines.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Order Number: {}", self.order_number),
            format!("Total Amount: {}", self.total.display()),
            format!("Payment Method: {}", self.payment_method),
            format!("Shipping Address: {}", self.shipping_address),
            "Items:".to_string(),
        ];
        lines.extend(
            self.items
                .iter()
                .map(|line| format!("  - {} x {}", line.title, line.quantity)),
        );
        lines
    }
}

impl From<&Order> for Receipt {
    fn from(order: &Order) -> Self {
        Receipt::from_order(order)
    }
}
