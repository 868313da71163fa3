//! Shared types for the café ordering core
//!
//! Catalog, cart, delivery location and checkout types used by both the
//! backend client and the core.

pub mod models;
pub mod util;

// Re-exports
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};
