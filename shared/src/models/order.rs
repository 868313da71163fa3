//! Order Model
//!
//! Local order history. An order is recorded only after the payment
//! provider reports it paid.

use super::cart::CartLine;
use super::location::DeliveryLocationPayload;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Delivery or pickup
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    #[default]
    Delivery,
    Pickup,
}

impl DeliveryMethod {
    pub fn requires_location(&self) -> bool {
        matches!(self, DeliveryMethod::Delivery)
    }
}

/// Order status as shown in history
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
}

/// Order history entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Local id
    pub id: String,
    /// Backend order id
    pub api_order_id: i64,
    pub client_reference: String,
    pub items: Vec<CartLine>,
    /// Local totals (major units)
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    /// Backend totals, as sent at checkout
    pub total_ghs: Decimal,
    pub total_pesewas: i64,
    pub delivery_method: DeliveryMethod,
    pub customer_name: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub delivery_note: String,
    pub delivery_location: Option<DeliveryLocationPayload>,
    pub status: OrderStatus,
    /// RFC 3339
    pub created_at: String,
}
