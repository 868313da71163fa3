//! Cart → `POST /orders/checkout` body

use shared::models::{CartLine, CheckoutItem, CheckoutRequest, DeliveryMethod, ToppingRef};

use crate::store::StoreState;

/// Shown to the kitchen when a pickup order carries no address
const PICKUP_LOCATION_TEXT: &str = "Pickup";

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

fn checkout_item(line: &CartLine) -> CheckoutItem {
    let toppings = line
        .free_topping_id
        .into_iter()
        .chain(line.topping_ids.iter().copied())
        .map(|topping_id| ToppingRef { topping_id })
        .collect();

    CheckoutItem {
        product_id: line.item_id,
        variant_id: line.variant_id,
        quantity: line.quantity,
        toppings,
        sugar_level: line.sugar_level.map(|l| l.to_string()),
        spice_level: line.spice_level.map(|l| l.to_string()),
        note: non_blank(Some(&line.note)),
    }
}

/// Human-readable delivery target: location label, else the typed address
pub fn location_text(state: &StoreState) -> Option<String> {
    non_blank(state.delivery_location.as_ref().map(|l| l.label.as_str()))
        .or_else(|| non_blank(Some(&state.delivery_address)))
}

/// Delivery notes: location notes, else the free-text delivery note
pub fn delivery_notes(state: &StoreState) -> Option<String> {
    non_blank(state.delivery_location.as_ref().and_then(|l| l.notes.as_deref()))
        .or_else(|| non_blank(Some(&state.delivery_note)))
}

/// Build the checkout body. Prices are not sent; the backend reprices.
pub fn build_checkout_request(state: &StoreState) -> CheckoutRequest {
    let location_text = match (location_text(state), state.delivery_method) {
        (Some(text), _) => text,
        (None, DeliveryMethod::Pickup) => PICKUP_LOCATION_TEXT.to_string(),
        (None, DeliveryMethod::Delivery) => String::new(),
    };

    CheckoutRequest {
        phone: state.customer_phone.trim().to_string(),
        location_text,
        notes: delivery_notes(state),
        items: state.cart.lines().iter().map(checkout_item).collect(),
    }
}
