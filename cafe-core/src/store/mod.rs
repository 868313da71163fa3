//! CafeStore - observable cart and checkout-field state
//!
//! One explicit state object shared (via `Arc`) by every consumer. Each
//! mutation:
//!
//! ```text
//! mutate(f)
//!     ├─ 1. Take write lock, apply f
//!     ├─ 2. Persist the persisted subset (if storage attached)
//!     ├─ 3. Release lock
//!     └─ 4. Broadcast StoreEvent
//! ```
//!
//! Persistence failures are logged and never fail the mutation.

pub mod storage;

pub use storage::{StateStorage, StorageError, StorageResult, DEFAULT_NAMESPACE};

use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{CartLine, DeliveryLocationPayload, DeliveryMethod, MenuItem, Order};
use tokio::sync::broadcast;

use crate::cart::{AddOutcome, CartLedger, LineSelection};
use crate::pricing::{self, ToppingPrices};

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Subset of the store that survives a session
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub cart: Vec<CartLine>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub delivery_address: String,
    #[serde(default)]
    pub delivery_method: DeliveryMethod,
    #[serde(default)]
    pub delivery_location: Option<DeliveryLocationPayload>,
}

/// Full in-memory state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub cart: CartLedger,
    /// Newest first
    pub orders: Vec<Order>,
    pub customer_name: String,
    pub customer_phone: String,
    /// Free-text address, used when no structured location is selected
    pub delivery_address: String,
    pub delivery_note: String,
    pub delivery_method: DeliveryMethod,
    pub delivery_location: Option<DeliveryLocationPayload>,
}

impl StoreState {
    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            cart: self.cart.lines().to_vec(),
            orders: self.orders.clone(),
            customer_name: self.customer_name.clone(),
            customer_phone: self.customer_phone.clone(),
            delivery_address: self.delivery_address.clone(),
            delivery_method: self.delivery_method,
            delivery_location: self.delivery_location.clone(),
        }
    }

    /// Reset checkout inputs to their defaults
    fn reset_checkout_fields(&mut self) {
        self.customer_name.clear();
        self.customer_phone.clear();
        self.delivery_address.clear();
        self.delivery_note.clear();
        self.delivery_method = DeliveryMethod::default();
        self.delivery_location = None;
    }
}

impl From<PersistedState> for StoreState {
    fn from(p: PersistedState) -> Self {
        Self {
            cart: CartLedger::from_lines(p.cart),
            orders: p.orders,
            customer_name: p.customer_name,
            customer_phone: p.customer_phone,
            delivery_address: p.delivery_address,
            delivery_note: String::new(),
            delivery_method: p.delivery_method,
            delivery_location: p.delivery_location,
        }
    }
}

/// Change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    CartChanged,
    CustomerChanged,
    DeliveryChanged,
    /// Order moved into history, cart and fields reset
    OrderConfirmed { order_id: String },
}

/// Shared cart/checkout store
pub struct CafeStore {
    state: RwLock<StoreState>,
    events: broadcast::Sender<StoreEvent>,
    storage: Option<StateStorage>,
}

impl std::fmt::Debug for CafeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CafeStore")
            .field("state", &*self.state.read())
            .field("storage", &self.storage)
            .finish()
    }
}

impl Default for CafeStore {
    fn default() -> Self {
        Self::new(StoreState::default())
    }
}

impl CafeStore {
    /// Create a store with the given initial state, no persistence
    pub fn new(initial: StoreState) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(initial),
            events,
            storage: None,
        }
    }

    /// Restore from storage and keep persisting to it
    pub fn restore(storage: StateStorage) -> StorageResult<Self> {
        let initial = match storage.load()? {
            Some(persisted) => {
                tracing::info!(
                    lines = persisted.cart.len(),
                    orders = persisted.orders.len(),
                    "Store restored from storage"
                );
                StoreState::from(persisted)
            }
            None => StoreState::default(),
        };
        let mut store = Self::new(initial);
        store.storage = Some(storage);
        Ok(store)
    }

    /// Observe mutations
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Clone of the full state
    pub fn snapshot(&self) -> StoreState {
        self.state.read().clone()
    }

    /// Read without cloning
    pub fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.state.read())
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut StoreState) -> (R, Option<StoreEvent>)) -> R {
        let (result, event) = {
            let mut state = self.state.write();
            let (result, event) = f(&mut state);
            if event.is_some()
                && let Some(storage) = &self.storage
                && let Err(e) = storage.save(&state.persisted())
            {
                tracing::error!(error = %e, "Failed to persist store state");
            }
            (result, event)
        };
        if let Some(event) = event {
            // No subscribers is fine
            let _ = self.events.send(event);
        }
        result
    }

    // ========== Cart ==========

    pub fn cart(&self) -> Vec<CartLine> {
        self.read(|s| s.cart.lines().to_vec())
    }

    pub fn cart_count(&self) -> u32 {
        self.read(|s| pricing::cart_count(s.cart.lines()))
    }

    pub fn cart_total<P: ToppingPrices + ?Sized>(&self, prices: &P) -> Decimal {
        self.read(|s| pricing::cart_total(s.cart.lines(), prices))
    }

    pub fn add_line(&self, item: &MenuItem, selection: LineSelection) -> AddOutcome {
        self.mutate(|s| {
            let outcome = s.cart.add_line(item, selection);
            let event = outcome.changed().then_some(StoreEvent::CartChanged);
            (outcome, event)
        })
    }

    pub fn increment_line(&self, line_id: &str) -> bool {
        self.mutate(|s| cart_event(s.cart.increment_line(line_id)))
    }

    pub fn decrement_line(&self, line_id: &str) -> bool {
        self.mutate(|s| cart_event(s.cart.decrement_line(line_id)))
    }

    pub fn remove_line(&self, line_id: &str) -> bool {
        self.mutate(|s| cart_event(s.cart.remove_line(line_id)))
    }

    pub fn clear_cart(&self) -> bool {
        self.mutate(|s| cart_event(s.cart.clear()))
    }

    // ========== Checkout fields ==========

    pub fn set_customer_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.mutate(|s| {
            s.customer_name = name;
            ((), Some(StoreEvent::CustomerChanged))
        })
    }

    pub fn set_customer_phone(&self, phone: impl Into<String>) {
        let phone = phone.into();
        self.mutate(|s| {
            s.customer_phone = phone;
            ((), Some(StoreEvent::CustomerChanged))
        })
    }

    pub fn set_delivery_address(&self, address: impl Into<String>) {
        let address = address.into();
        self.mutate(|s| {
            s.delivery_address = address;
            ((), Some(StoreEvent::DeliveryChanged))
        })
    }

    pub fn set_delivery_note(&self, note: impl Into<String>) {
        let note = note.into();
        self.mutate(|s| {
            s.delivery_note = note;
            ((), Some(StoreEvent::DeliveryChanged))
        })
    }

    pub fn set_delivery_method(&self, method: DeliveryMethod) {
        self.mutate(|s| {
            s.delivery_method = method;
            ((), Some(StoreEvent::DeliveryChanged))
        })
    }

    pub fn set_delivery_location(&self, location: Option<DeliveryLocationPayload>) {
        self.mutate(|s| {
            s.delivery_location = location;
            ((), Some(StoreEvent::DeliveryChanged))
        })
    }

    /// Merge notes into the current location, keeping label and coordinates.
    ///
    /// Returns false when no location is selected.
    pub fn set_location_notes(&self, notes: Option<String>) -> bool {
        self.mutate(|s| match s.delivery_location.take() {
            Some(location) => {
                s.delivery_location = Some(location.with_notes(notes));
                (true, Some(StoreEvent::DeliveryChanged))
            }
            None => (false, None),
        })
    }

    pub fn delivery_location(&self) -> Option<DeliveryLocationPayload> {
        self.read(|s| s.delivery_location.clone())
    }

    // ========== Orders ==========

    pub fn orders(&self) -> Vec<Order> {
        self.read(|s| s.orders.clone())
    }

    /// Record a paid order: prepend to history, clear the cart and reset
    /// checkout fields, all under one lock.
    pub fn confirm_order(&self, order: Order) {
        let order_id = order.id.clone();
        self.mutate(|s| {
            tracing::info!(order_id = %order.id, api_order_id = order.api_order_id, "Order confirmed");
            s.orders.insert(0, order);
            s.cart.clear();
            s.reset_checkout_fields();
            ((), Some(StoreEvent::OrderConfirmed { order_id }))
        })
    }
}

fn cart_event(changed: bool) -> (bool, Option<StoreEvent>) {
    (changed, changed.then_some(StoreEvent::CartChanged))
}

#[cfg(test)]
mod tests;
