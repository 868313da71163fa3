//! Checkout form validation
//!
//! Runs against a store snapshot before any network call.

use std::collections::BTreeMap;
use std::fmt;

use crate::store::StoreState;

/// Form field that can carry an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckoutField {
    CustomerName,
    CustomerPhone,
    DeliveryLocation,
    Cart,
}

impl CheckoutField {
    pub fn message(&self) -> &'static str {
        match self {
            CheckoutField::CustomerName => "Name is required",
            CheckoutField::CustomerPhone => "Phone number is required",
            CheckoutField::DeliveryLocation => "Please select a delivery location",
            CheckoutField::Cart => "Your cart is empty",
        }
    }
}

/// Per-field errors, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<CheckoutField, &'static str>);

impl FieldErrors {
    fn flag(&mut self, field: CheckoutField) {
        self.0.insert(field, field.message());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: CheckoutField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn contains(&self, field: CheckoutField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CheckoutField, &'static str)> + '_ {
        self.0.iter().map(|(f, m)| (*f, *m))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().copied().collect();
        write!(f, "{}", messages.join(", "))
    }
}

/// Check every field, collecting all errors
pub fn validate(state: &StoreState) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    if state.customer_name.trim().is_empty() {
        errors.flag(CheckoutField::CustomerName);
    }
    if state.customer_phone.trim().is_empty() {
        errors.flag(CheckoutField::CustomerPhone);
    }
    if state.delivery_method.requires_location()
        && !state
            .delivery_location
            .as_ref()
            .is_some_and(|location| location.has_label())
    {
        errors.flag(CheckoutField::DeliveryLocation);
    }
    if state.cart.is_empty() {
        errors.flag(CheckoutField::Cart);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
