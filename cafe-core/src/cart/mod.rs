//! Cart ledger
//!
//! Ordered collection of customized lines, newest first. Owns line
//! identity and duplicate merging:
//!
//! ```text
//! add_line(item, selection)
//!     ├─ 1. Resolve option (by key → first option → flat price)
//!     ├─ 2. Apply category rules (sugar: drinks, spice + no toppings: shawarma)
//!     ├─ 3. Trim note
//!     ├─ 4. Empty note + same LineKey as an empty-note line → merge quantity
//!     └─ 5. Otherwise prepend a new line with a fresh id
//! ```

use rust_decimal::Decimal;
use shared::models::{CartLine, Level, MenuItem, PricingMode};
use shared::util::new_line_id;

/// Option key used for flat-priced items
pub const FLAT_OPTION_KEY: &str = "regular";
const FLAT_OPTION_LABEL: &str = "Regular";

/// Customer choices for one add-to-cart
#[derive(Debug, Clone, PartialEq)]
pub struct LineSelection {
    pub option_key: String,
    pub free_topping_id: Option<i64>,
    pub topping_ids: Vec<i64>,
    pub sugar_level: Level,
    pub spice_level: Level,
    pub note: String,
    pub quantity: u32,
}

impl Default for LineSelection {
    fn default() -> Self {
        Self {
            option_key: String::new(),
            free_topping_id: None,
            topping_ids: Vec::new(),
            sugar_level: Level::default(),
            spice_level: Level::default(),
            note: String::new(),
            quantity: 1,
        }
    }
}

impl LineSelection {
    pub fn option(mut self, key: impl Into<String>) -> Self {
        self.option_key = key.into();
        self
    }

    pub fn free_topping(mut self, id: i64) -> Self {
        self.free_topping_id = Some(id);
        self
    }

    pub fn toppings(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.topping_ids = ids.into_iter().collect();
        self
    }

    pub fn sugar(mut self, level: Level) -> Self {
        self.sugar_level = level;
        self
    }

    pub fn spice(mut self, level: Level) -> Self {
        self.spice_level = level;
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }
}

/// What `add_line` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// New line prepended
    Inserted { line_id: String },
    /// Quantity added to an existing line
    Merged { line_id: String },
    /// Item could not be priced or quantity was zero
    Ignored,
}

impl AddOutcome {
    pub fn line_id(&self) -> Option<&str> {
        match self {
            AddOutcome::Inserted { line_id } | AddOutcome::Merged { line_id } => Some(line_id),
            AddOutcome::Ignored => None,
        }
    }

    pub fn changed(&self) -> bool {
        !matches!(self, AddOutcome::Ignored)
    }
}

struct ResolvedOption {
    key: String,
    label: String,
    price: Decimal,
    variant_id: Option<i64>,
}

/// Chosen option, falling back to the first option, or the flat price
fn resolve_option(item: &MenuItem, key: &str) -> Option<ResolvedOption> {
    match item.pricing_mode() {
        PricingMode::Variants => {
            let option = item.option(key).or_else(|| item.options.first())?;
            Some(ResolvedOption {
                key: option.key.clone(),
                label: option.label.clone(),
                price: option.price_ghs,
                variant_id: Some(option.id),
            })
        }
        PricingMode::Flat => Some(ResolvedOption {
            key: FLAT_OPTION_KEY.to_string(),
            label: FLAT_OPTION_LABEL.to_string(),
            price: item.price_ghs?,
            variant_id: None,
        }),
        PricingMode::Invalid => None,
    }
}

/// The cart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartLedger {
    lines: Vec<CartLine>,
}

impl CartLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger restored from persisted lines. Zero-quantity lines are dropped.
    pub fn from_lines(mut lines: Vec<CartLine>) -> Self {
        lines.retain(|l| l.quantity > 0);
        Self { lines }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, line_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.line_id == line_id)
    }

    /// Add a customized item, merging with an identical line when possible.
    ///
    /// Items without a usable price are ignored rather than rejected; the
    /// catalog is trusted input.
    pub fn add_line(&mut self, item: &MenuItem, selection: LineSelection) -> AddOutcome {
        if selection.quantity == 0 {
            return AddOutcome::Ignored;
        }
        let Some(option) = resolve_option(item, &selection.option_key) else {
            tracing::warn!(item_id = item.id, "Item has no price, add ignored");
            return AddOutcome::Ignored;
        };

        let shawarma = item.is_shawarma();
        let (free_topping_id, topping_ids) = if shawarma {
            (None, Vec::new())
        } else {
            (selection.free_topping_id, selection.topping_ids)
        };

        let candidate = CartLine {
            line_id: new_line_id(),
            item_id: item.id,
            item_name: item.name.clone(),
            option_key: option.key,
            option_label: option.label,
            variant_id: option.variant_id,
            unit_price_ghs: option.price,
            quantity: selection.quantity,
            free_topping_id,
            topping_ids,
            sugar_level: item.is_drink().then_some(selection.sugar_level),
            spice_level: shawarma.then_some(selection.spice_level),
            note: selection.note.trim().to_string(),
        };

        if let Some(key) = candidate.dedup_key()
            && let Some(existing) = self
                .lines
                .iter_mut()
                .find(|l| l.dedup_key().as_ref() == Some(&key))
        {
            existing.quantity = existing.quantity.saturating_add(candidate.quantity);
            tracing::debug!(line_id = %existing.line_id, quantity = existing.quantity, "Cart line merged");
            return AddOutcome::Merged {
                line_id: existing.line_id.clone(),
            };
        }

        let line_id = candidate.line_id.clone();
        tracing::debug!(line_id = %line_id, item_id = item.id, "Cart line added");
        self.lines.insert(0, candidate);
        AddOutcome::Inserted { line_id }
    }

    /// +1, capped at `u32::MAX`. Unknown ids are ignored.
    pub fn increment_line(&mut self, line_id: &str) -> bool {
        match self.lines.iter_mut().find(|l| l.line_id == line_id) {
            Some(line) if line.quantity < u32::MAX => {
                line.quantity += 1;
                true
            }
            _ => false,
        }
    }

    /// -1, removing the line when it reaches zero. Unknown ids are ignored.
    pub fn decrement_line(&mut self, line_id: &str) -> bool {
        let Some(pos) = self.lines.iter().position(|l| l.line_id == line_id) else {
            return false;
        };
        if self.lines[pos].quantity <= 1 {
            self.lines.remove(pos);
        } else {
            self.lines[pos].quantity -= 1;
        }
        true
    }

    /// Remove a line. Unknown ids are ignored.
    pub fn remove_line(&mut self, line_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.line_id != line_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.lines.is_empty();
        self.lines.clear();
        changed
    }
}
