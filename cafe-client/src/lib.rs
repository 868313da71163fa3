//! Cafe Client - HTTP client for the café backend
//!
//! Provides network-based calls to the catalog/order API and the
//! location API, behind the `CatalogApi`, `CheckoutApi` and `GeocodingApi`
//! contracts.

pub mod api;
pub mod config;
pub mod error;
pub mod http;

pub use api::{CatalogApi, CheckoutApi, GeocodingApi};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::NetworkHttpClient;
