//! Checkout DTOs
//!
//! Request/response shapes for `POST /orders/checkout` and
//! `GET /orders/status/{clientReference}`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Topping reference (id only, the backend prices it)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToppingRef {
    pub topping_id: i64,
}

/// One cart line as sent to the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub product_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<i64>,
    pub quantity: u32,
    /// Free topping first, then paid toppings
    pub toppings: Vec<ToppingRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spice_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// `POST /orders/checkout` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub phone: String,
    pub location_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<CheckoutItem>,
}

/// `POST /orders/checkout` response
///
/// Both money representations are kept as sent; neither is derived from
/// the other.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: i64,
    pub client_reference: String,
    pub total_ghs: Decimal,
    pub total_pesewas: i64,
    pub checkout_url: String,
    pub checkout_direct_url: String,
    #[serde(default)]
    pub message: String,
}

/// Payment status classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    /// Only `"paid"` and `"failed"` are terminal; anything else is pending
    pub fn classify(raw: &str) -> Self {
        match raw {
            "paid" => PaymentStatus::Paid,
            "failed" => PaymentStatus::Failed,
            _ => PaymentStatus::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

/// `GET /orders/status/{clientReference}` response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusResponse {
    pub order_id: i64,
    pub status: String,
    pub payment_status: String,
    pub total_ghs: Decimal,
    pub created_at: String,
}

impl OrderStatusResponse {
    pub fn payment(&self) -> PaymentStatus {
        PaymentStatus::classify(&self.payment_status)
    }
}

/// Backend error message: a single string or a list of validation messages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ApiErrorMessage {
    One(String),
    Many(Vec<String>),
}

/// Backend error body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub message: ApiErrorMessage,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    /// Flattened message for display
    pub fn message_text(&self) -> String {
        match &self.message {
            ApiErrorMessage::One(m) => m.clone(),
            ApiErrorMessage::Many(ms) => ms.join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_classification() {
        assert_eq!(PaymentStatus::classify("paid"), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::classify("failed"), PaymentStatus::Failed);
        assert_eq!(PaymentStatus::classify("pending"), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::classify("initiated"), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::classify("PAID"), PaymentStatus::Pending);
    }

    #[test]
    fn test_checkout_item_omits_absent_fields() {
        let item = CheckoutItem {
            product_id: 3,
            variant_id: None,
            quantity: 2,
            toppings: vec![ToppingRef { topping_id: 5 }],
            sugar_level: Some("2".into()),
            spice_level: None,
            note: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["productId"], 3);
        assert_eq!(json["toppings"][0]["toppingId"], 5);
        assert_eq!(json["sugarLevel"], "2");
        assert!(json.get("variantId").is_none());
        assert!(json.get("spiceLevel").is_none());
        assert!(json.get("note").is_none());
    }

    #[test]
    fn test_checkout_response_keeps_both_totals() {
        let json = r#"{
            "orderId": 101,
            "clientReference": "ref-abc",
            "totalGhs": 128.5,
            "totalPesewas": 12850,
            "checkoutUrl": "https://pay.example/c/1",
            "checkoutDirectUrl": "https://pay.example/d/1",
            "message": "ok"
        }"#;
        let resp: CheckoutResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.order_id, 101);
        assert_eq!(resp.total_ghs, Decimal::new(1285, 1));
        assert_eq!(resp.total_pesewas, 12850);
    }

    #[test]
    fn test_error_body_messages() {
        let one: ApiErrorBody =
            serde_json::from_str(r#"{"message":"Out of stock","statusCode":409}"#).unwrap();
        assert_eq!(one.message_text(), "Out of stock");

        let many: ApiErrorBody = serde_json::from_str(
            r#"{"message":["phone must be a string","items should not be empty"],"statusCode":400,"error":"Bad Request"}"#,
        )
        .unwrap();
        assert_eq!(
            many.message_text(),
            "phone must be a string, items should not be empty"
        );
    }
}
