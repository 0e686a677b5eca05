//! Backend access for the Folio storefront.
//!
//! This crate provides:
//! - `StoreApi` - The backend operations the storefront depends on
//! - `BackendClient` - HTTP implementation with bearer auth and retries
//! - `Endpoint` - Catalogue of backend endpoints and their semantics
//! - `RetryPolicy` - Retry strategies for idempotent reads
//! - `TokenStore` - Persistent bearer token storage
//! - `ApiError` - Backend failures normalized to a single typed error

mod api;
mod client;
mod credentials;
mod dto;
mod endpoint;
mod error;
mod retry;

pub use api::*;
pub use client::*;
pub use credentials::*;
pub use dto::*;
pub use endpoint::*;
pub use error::*;
pub use retry::*;
