//! Catalogue search filters.

use serde::{Deserialize, Serialize};

/// Filters for listing books. Unset filters are not sent.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BookQuery {
    /// Free-text search over titles.
    pub search: Option<String>,
    /// Genre, sent as `category`.
    pub category: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
}

impl BookQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text search. Blank input clears it.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = non_blank(search.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_blank(category.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = non_blank(author.into());
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = non_blank(publisher.into());
        self
    }

    /// Query-string pairs for the filters that are set, in a stable order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        [
            ("category", &self.category),
            ("search", &self.search),
            ("author", &self.author),
            ("publisher", &self.publisher),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|v| (key, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.params().is_empty()
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
