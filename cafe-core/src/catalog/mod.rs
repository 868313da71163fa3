//! Catalog cache
//!
//! Menu items and toppings loaded once per session. Written at init,
//! read by the cart and pricing for the rest of the session.

use std::collections::HashMap;
use std::sync::Arc;

use cafe_client::{CatalogApi, ClientResult};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use shared::models::{CatalogCategory, CatalogResponse, CategoryKey, MenuItem, Topping};

use crate::pricing::ToppingPrices;

/// Immutable catalog snapshot with id indexes
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    pub categories: Vec<CatalogCategory>,
    pub items: Vec<MenuItem>,
    pub toppings: Vec<Topping>,
    item_index: HashMap<i64, usize>,
    topping_index: HashMap<i64, usize>,
}

impl CatalogSnapshot {
    pub fn new(resp: CatalogResponse) -> Self {
        let item_index = resp
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.id, i))
            .collect();
        let topping_index = resp
            .toppings
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id, i))
            .collect();
        Self {
            categories: resp.categories,
            items: resp.items,
            toppings: resp.toppings,
            item_index,
            topping_index,
        }
    }

    pub fn item(&self, id: i64) -> Option<&MenuItem> {
        self.item_index.get(&id).and_then(|i| self.items.get(*i))
    }

    pub fn topping(&self, id: i64) -> Option<&Topping> {
        self.topping_index.get(&id).and_then(|i| self.toppings.get(*i))
    }

    /// Items of one category, in catalog order
    pub fn items_in(&self, category: CategoryKey) -> impl Iterator<Item = &MenuItem> {
        self.items.iter().filter(move |item| item.category == category)
    }
}

impl ToppingPrices for CatalogSnapshot {
    fn topping_price(&self, topping_id: i64) -> Option<Decimal> {
        self.topping(topping_id).map(|t| t.price_ghs)
    }
}

/// Shared catalog cache
#[derive(Debug, Clone, Default)]
pub struct CatalogCache {
    snapshot: Arc<RwLock<Arc<CatalogSnapshot>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache pre-filled with a known catalog
    pub fn with_catalog(resp: CatalogResponse) -> Self {
        let cache = Self::new();
        cache.replace(resp);
        cache
    }

    /// Fetch from the backend and install the snapshot.
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn load(&self, api: &dyn CatalogApi) -> ClientResult<Arc<CatalogSnapshot>> {
        let resp = api.fetch_catalog().await.inspect_err(|e| {
            tracing::error!(error = %e, "Catalog fetch failed");
        })?;
        tracing::info!(
            items = resp.items.len(),
            toppings = resp.toppings.len(),
            "Catalog loaded"
        );
        Ok(self.replace(resp))
    }

    fn replace(&self, resp: CatalogResponse) -> Arc<CatalogSnapshot> {
        let snapshot = Arc::new(CatalogSnapshot::new(resp));
        *self.snapshot.write() = snapshot.clone();
        snapshot
    }

    /// Current snapshot (cheap clone)
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.snapshot.read().clone()
    }

    pub fn is_loaded(&self) -> bool {
        !self.snapshot.read().items.is_empty()
    }

    pub fn item(&self, id: i64) -> Option<MenuItem> {
        self.snapshot.read().item(id).cloned()
    }

    pub fn topping(&self, id: i64) -> Option<Topping> {
        self.snapshot.read().topping(id).cloned()
    }

    pub fn toppings(&self) -> Vec<Topping> {
        self.snapshot.read().toppings.clone()
    }
}

impl ToppingPrices for CatalogCache {
    fn topping_price(&self, topping_id: i64) -> Option<Decimal> {
        self.snapshot.read().topping_price(topping_id)
    }
}
