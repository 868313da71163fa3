//! Data models
//!
//! Shared between cafe-client and cafe-core.
//! Wire format is camelCase JSON, as served by the backend.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod levels;
pub mod location;
pub mod order;

// Re-exports
pub use cart::*;
pub use catalog::*;
pub use checkout::*;
pub use levels::*;
pub use location::*;
pub use order::*;
