//! Where the storefront goes after checkout.

use folio_commerce::prelude::Order;

/// A destination the checkout can send the shopper to.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Receipt view for the order the backend just created.
    Receipt(Order),
}

/// Performs navigation for the hosting UI.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
