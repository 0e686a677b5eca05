//! Books as listed by the backend catalogue.

use crate::ids::BookId;
use crate::money::Money;
use crate::wire::{major_units, null_as_default};
use serde::{Deserialize, Serialize};

/// A book in the catalogue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// Unit price.
    #[serde(with = "major_units")]
    pub price: Money,
    /// Copies in stock.
    #[serde(default)]
    pub quantity: u32,
    /// Whether the book can be ordered. The backend sends this as
    /// `available` or `isAvailable` depending on the serializer.
    #[serde(default = "available_by_default", alias = "isAvailable")]
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author_names: Vec<String>,
}

fn available_by_default() -> bool {
    true
}

impl Book {
    /// Whether the book can be added to a cart.
    pub fn is_purchasable(&self) -> bool {
        self.available && self.quantity > 0
    }

    /// Authors joined for display, or `"Unknown author"`.
    pub fn authors(&self) -> String {
        if self.author_names.is_empty() {
            "Unknown author".to_string()
        } else {
            let mut names = self.author_names.clone();
            names.sort();
            names.join(", ")
        }
    }
}
