//! Delivery location
//!
//! Turns typed queries, selected suggestions and GPS fixes into the
//! store's `DeliveryLocationPayload`.

use std::time::Duration;

pub mod debounce;
pub mod resolver;

pub use debounce::{SearchDebouncer, SearchOutcome};
pub use resolver::{LocationError, LocationResolver, PositionError, PositionSource};

/// Delay between the last keystroke and the search call
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Shorter (trimmed) queries are not searched
pub const MIN_QUERY_CHARS: usize = 2;
