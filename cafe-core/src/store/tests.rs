use super::*;
use rust_decimal::Decimal;
use shared::models::{CategoryKey, DeliveryLocationPayload, LocationProvider, OrderStatus, Topping};

fn milk_tea() -> MenuItem {
    MenuItem {
        id: 1,
        slug: "classic-milk-tea".into(),
        name: "Classic Milk Tea".into(),
        description: String::new(),
        category: CategoryKey::MilkTea,
        price_ghs: Some(Decimal::from(35)),
        options: vec![],
        image: None,
        in_stock: true,
    }
}

fn order(id: &str) -> Order {
    Order {
        id: id.into(),
        api_order_id: 101,
        client_reference: "ref-1".into(),
        items: vec![],
        subtotal: Decimal::from(70),
        delivery_fee: Decimal::ZERO,
        total: Decimal::from(70),
        total_ghs: Decimal::from(70),
        total_pesewas: 7000,
        delivery_method: DeliveryMethod::Delivery,
        customer_name: "Ama".into(),
        customer_phone: "0241234567".into(),
        delivery_address: String::new(),
        delivery_note: String::new(),
        delivery_location: None,
        status: OrderStatus::Confirmed,
        created_at: shared::util::now_rfc3339(),
    }
}

fn labelled_location() -> DeliveryLocationPayload {
    DeliveryLocationPayload {
        label: "Osu Oxford Street".into(),
        lat: Some(5.556),
        lng: Some(-0.182),
        provider: LocationProvider::Tomtom,
        provider_place_id: Some("tt-1".into()),
        ..Default::default()
    }
}

// ========================================================================
// Events
// ========================================================================

#[test]
fn test_mutations_notify_subscribers() {
    let store = CafeStore::default();
    let mut rx = store.subscribe();

    store.add_line(&milk_tea(), LineSelection::default());
    store.set_customer_name("Ama");
    store.set_delivery_method(DeliveryMethod::Pickup);

    assert_eq!(rx.try_recv().unwrap(), StoreEvent::CartChanged);
    assert_eq!(rx.try_recv().unwrap(), StoreEvent::CustomerChanged);
    assert_eq!(rx.try_recv().unwrap(), StoreEvent::DeliveryChanged);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_noop_cart_ops_do_not_notify() {
    let store = CafeStore::default();
    let mut rx = store.subscribe();

    assert!(!store.increment_line("missing"));
    assert!(!store.remove_line("missing"));
    assert!(!store.clear_cart());
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_cart_totals() {
    let store = CafeStore::default();
    let id = store
        .add_line(&milk_tea(), LineSelection::default().toppings([8]))
        .line_id()
        .unwrap()
        .to_string();
    store.increment_line(&id);

    let toppings = vec![Topping {
        id: 8,
        name: "Pearls".into(),
        price_ghs: Decimal::from(8),
        in_stock: true,
    }];
    assert_eq!(store.cart_count(), 2);
    assert_eq!(store.cart_total(&toppings), Decimal::from(86));
}

// ========================================================================
// Location notes
// ========================================================================

#[test]
fn test_location_notes_merge_keeps_label_and_coordinates() {
    let store = CafeStore::default();
    assert!(!store.set_location_notes(Some("Gate 2".into())));

    store.set_delivery_location(Some(labelled_location()));
    assert!(store.set_location_notes(Some("Gate 2".into())));

    let location = store.delivery_location().unwrap();
    assert_eq!(location.label, "Osu Oxford Street");
    assert_eq!(location.lat, Some(5.556));
    assert_eq!(location.notes.as_deref(), Some("Gate 2"));
}

// ========================================================================
// confirm_order
// ========================================================================

#[test]
fn test_confirm_order_resets_checkout() {
    let store = CafeStore::default();
    store.add_line(&milk_tea(), LineSelection::default());
    store.set_customer_name("Ama");
    store.set_customer_phone("0241234567");
    store.set_delivery_address("Osu");
    store.set_delivery_note("Call on arrival");
    store.set_delivery_method(DeliveryMethod::Pickup);
    store.set_delivery_location(Some(labelled_location()));
    store.confirm_order(order("old"));

    let mut rx = store.subscribe();
    store.add_line(&milk_tea(), LineSelection::default());
    store.confirm_order(order("new"));

    let state = store.snapshot();
    assert!(state.cart.is_empty());
    assert_eq!(state.customer_name, "");
    assert_eq!(state.customer_phone, "");
    assert_eq!(state.delivery_address, "");
    assert_eq!(state.delivery_note, "");
    assert_eq!(state.delivery_method, DeliveryMethod::Delivery);
    assert!(state.delivery_location.is_none());
    // Newest first
    assert_eq!(state.orders[0].id, "new");
    assert_eq!(state.orders[1].id, "old");

    assert_eq!(rx.try_recv().unwrap(), StoreEvent::CartChanged);
    assert_eq!(
        rx.try_recv().unwrap(),
        StoreEvent::OrderConfirmed {
            order_id: "new".into()
        }
    );
}

// ========================================================================
// Persistence
// ========================================================================

#[test]
fn test_restore_round_trip() {
    let storage = StateStorage::open_in_memory().unwrap();

    {
        let store = CafeStore::restore(storage.clone()).unwrap();
        store.add_line(&milk_tea(), LineSelection::default().quantity(2));
        store.set_customer_name("Ama");
        store.set_delivery_location(Some(labelled_location()));
        store.set_delivery_note("not persisted");
    }

    let restored = CafeStore::restore(storage).unwrap().snapshot();
    assert_eq!(restored.cart.len(), 1);
    assert_eq!(restored.cart.lines()[0].quantity, 2);
    assert_eq!(restored.customer_name, "Ama");
    assert_eq!(restored.delivery_location, Some(labelled_location()));
    assert_eq!(restored.delivery_note, "");
}

#[test]
fn test_restore_empty_storage() {
    let storage = StateStorage::open_in_memory().unwrap();
    let store = CafeStore::restore(storage).unwrap();
    assert_eq!(store.snapshot(), StoreState::default());
}

#[test]
fn test_persisted_state_json_keys() {
    let json = serde_json::to_value(PersistedState::default()).unwrap();
    let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "cart",
            "customerName",
            "customerPhone",
            "deliveryAddress",
            "deliveryLocation",
            "deliveryMethod",
            "orders"
        ]
    );
}
