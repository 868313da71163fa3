//! API contracts
//!
//! The core depends on these traits, never on reqwest directly, so the
//! checkout flow and location resolver can run against test doubles.

use crate::ClientResult;
use async_trait::async_trait;
use shared::models::{
    AutocompleteSuggestion, CatalogResponse, CheckoutRequest, CheckoutResponse, Coordinates,
    OrderStatusResponse, ReverseGeocodeResult,
};

/// Catalog source
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET /catalog`
    async fn fetch_catalog(&self) -> ClientResult<CatalogResponse>;
}

/// Order submission and payment status
#[async_trait]
pub trait CheckoutApi: Send + Sync {
    /// `POST /orders/checkout`
    async fn submit_checkout(&self, request: &CheckoutRequest) -> ClientResult<CheckoutResponse>;

    /// `GET /orders/status/{clientReference}`
    async fn order_status(&self, client_reference: &str) -> ClientResult<OrderStatusResponse>;
}

/// Place search and reverse geocoding
#[async_trait]
pub trait GeocodingApi: Send + Sync {
    /// Suggestions for a typed query, optionally biased toward a position
    async fn search(
        &self,
        query: &str,
        bias: Option<Coordinates>,
    ) -> ClientResult<Vec<AutocompleteSuggestion>>;

    /// Resolve a coordinate into a readable place
    async fn reverse(&self, at: Coordinates) -> ClientResult<ReverseGeocodeResult>;
}
