//! Cart line model

use super::levels::Level;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A customized, priced, quantified cart entry
///
/// Unit price is snapshotted at add time and never recomputed from the
/// catalog. Item name and option label are denormalized for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Locally generated opaque id
    pub line_id: String,
    pub item_id: i64,
    pub item_name: String,
    pub option_key: String,
    pub option_label: String,
    /// Backend variant id, only for variant-priced items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<i64>,
    pub unit_price_ghs: Decimal,
    pub quantity: u32,
    /// Complimentary topping, never priced
    pub free_topping_id: Option<i64>,
    /// Paid toppings
    #[serde(default)]
    pub topping_ids: Vec<i64>,
    /// Drinks only
    pub sugar_level: Option<Level>,
    /// Shawarma only
    pub spice_level: Option<Level>,
    #[serde(default)]
    pub note: String,
}

/// Structural identity used to merge duplicate adds
///
/// Paid toppings compare as a set, so selection order does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub item_id: i64,
    pub option_key: String,
    pub free_topping_id: Option<i64>,
    pub topping_ids: BTreeSet<i64>,
    pub sugar_level: Option<Level>,
    pub spice_level: Option<Level>,
}

impl CartLine {
    /// Dedup key, `None` when the line carries a note (notes never merge)
    pub fn dedup_key(&self) -> Option<LineKey> {
        if !self.note.trim().is_empty() {
            return None;
        }
        Some(LineKey {
            item_id: self.item_id,
            option_key: self.option_key.clone(),
            free_topping_id: self.free_topping_id,
            topping_ids: self.topping_ids.iter().copied().collect(),
            sugar_level: self.sugar_level,
            spice_level: self.spice_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(topping_ids: Vec<i64>, note: &str) -> CartLine {
        CartLine {
            line_id: "l-1".into(),
            item_id: 1,
            item_name: "Classic Milk Tea".into(),
            option_key: "regular".into(),
            option_label: "Regular".into(),
            variant_id: None,
            unit_price_ghs: Decimal::from(35),
            quantity: 1,
            free_topping_id: Some(3),
            topping_ids,
            sugar_level: Level::new(2),
            spice_level: None,
            note: note.into(),
        }
    }

    #[test]
    fn test_key_ignores_topping_order() {
        let a = line(vec![4, 9], "");
        let b = line(vec![9, 4], "");
        assert_eq!(a.dedup_key(), b.dedup_key());
        assert!(a.dedup_key().is_some());
    }

    #[test]
    fn test_note_has_no_key() {
        assert!(line(vec![], "less ice").dedup_key().is_none());
        assert!(line(vec![], "   ").dedup_key().is_some());
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(line(vec![4], "")).unwrap();
        assert_eq!(json["lineId"], "l-1");
        assert_eq!(json["sugarLevel"], 2);
        assert!(json.get("variantId").is_none());
        assert!(json["spiceLevel"].is_null());
    }
}
