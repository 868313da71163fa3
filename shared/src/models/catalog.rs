//! Catalog Model
//!
//! Menu items and toppings as served by the backend `/catalog` endpoint.
//! Read-only reference data for the cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu category (fixed set, drives the nav tabs)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryKey {
    MilkTea,
    HqSpecial,
    IcedTea,
    Milkshakes,
    Shawarma,
}

impl CategoryKey {
    /// All categories in nav order
    pub const ALL: [CategoryKey; 5] = [
        CategoryKey::MilkTea,
        CategoryKey::HqSpecial,
        CategoryKey::IcedTea,
        CategoryKey::Milkshakes,
        CategoryKey::Shawarma,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            CategoryKey::MilkTea => "Milk Tea",
            CategoryKey::HqSpecial => "HQ Special",
            CategoryKey::IcedTea => "Iced Tea",
            CategoryKey::Milkshakes => "Milkshakes",
            CategoryKey::Shawarma => "Shawarma",
        }
    }

    /// Drinks take a sugar level and toppings
    pub fn is_drink(&self) -> bool {
        !self.is_shawarma()
    }

    /// Shawarma takes a spice level and no toppings
    pub fn is_shawarma(&self) -> bool {
        matches!(self, CategoryKey::Shawarma)
    }
}

/// Variant choice of a menu item (e.g. shawarma size)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemOption {
    /// Backend variant id
    pub id: i64,
    pub key: String,
    pub label: String,
    pub price_ghs: Decimal,
}

/// How a menu item is priced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingMode {
    /// `price_ghs` set, no options
    Flat,
    /// options non-empty, `price_ghs` null
    Variants,
    /// Neither or both; the cart ignores such items
    Invalid,
}

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: i64,
    #[serde(default)]
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: CategoryKey,
    /// Flat price, null when the item is sold through variants
    pub price_ghs: Option<Decimal>,
    #[serde(default)]
    pub options: Vec<MenuItemOption>,
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub in_stock: bool,
}

fn default_true() -> bool {
    true
}

impl MenuItem {
    pub fn pricing_mode(&self) -> PricingMode {
        match (self.price_ghs.is_some(), self.options.is_empty()) {
            (true, true) => PricingMode::Flat,
            (false, false) => PricingMode::Variants,
            _ => PricingMode::Invalid,
        }
    }

    pub fn is_drink(&self) -> bool {
        self.category.is_drink()
    }

    pub fn is_shawarma(&self) -> bool {
        self.category.is_shawarma()
    }

    /// Find a variant by key
    pub fn option(&self, key: &str) -> Option<&MenuItemOption> {
        self.options.iter().find(|o| o.key == key)
    }
}

/// Topping entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Topping {
    pub id: i64,
    pub name: String,
    pub price_ghs: Decimal,
    #[serde(default = "default_true")]
    pub in_stock: bool,
}

/// Category entry returned with the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogCategory {
    pub slug: String,
    pub name: String,
}

/// `GET /catalog` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub categories: Vec<CatalogCategory>,
    #[serde(default)]
    pub items: Vec<MenuItem>,
    #[serde(default)]
    pub toppings: Vec<Topping>,
}
