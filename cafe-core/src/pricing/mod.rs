//! Pricing Engine
//!
//! Pure functions over cart lines. All arithmetic is `Decimal` in major
//! units (GHS); the free topping is tracked on the line but never priced.

use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::models::{CartLine, DeliveryMethod, Topping};

/// Topping price lookup
pub trait ToppingPrices {
    fn topping_price(&self, topping_id: i64) -> Option<Decimal>;
}

impl ToppingPrices for [Topping] {
    fn topping_price(&self, topping_id: i64) -> Option<Decimal> {
        self.iter()
            .find(|t| t.id == topping_id)
            .map(|t| t.price_ghs)
    }
}

impl ToppingPrices for Vec<Topping> {
    fn topping_price(&self, topping_id: i64) -> Option<Decimal> {
        self.as_slice().topping_price(topping_id)
    }
}

impl ToppingPrices for HashMap<i64, Decimal> {
    fn topping_price(&self, topping_id: i64) -> Option<Decimal> {
        self.get(&topping_id).copied()
    }
}

/// Sum of paid topping prices for one unit. Unknown toppings price at 0.
pub fn line_extra<P: ToppingPrices + ?Sized>(line: &CartLine, prices: &P) -> Decimal {
    line.topping_ids
        .iter()
        .map(|id| prices.topping_price(*id).unwrap_or(Decimal::ZERO))
        .sum()
}

/// `(unit price + extras) × quantity`
pub fn line_total<P: ToppingPrices + ?Sized>(line: &CartLine, prices: &P) -> Decimal {
    (line.unit_price_ghs + line_extra(line, prices)) * Decimal::from(line.quantity)
}

pub fn cart_total<P: ToppingPrices + ?Sized>(cart: &[CartLine], prices: &P) -> Decimal {
    cart.iter().map(|line| line_total(line, prices)).sum()
}

/// Number of units across all lines
pub fn cart_count(cart: &[CartLine]) -> u32 {
    cart.iter().map(|line| line.quantity).sum()
}

/// Order totals shown at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

impl Totals {
    /// The configured fee applies to delivery orders only
    pub fn compute<P: ToppingPrices + ?Sized>(
        cart: &[CartLine],
        prices: &P,
        method: DeliveryMethod,
        delivery_fee: Decimal,
    ) -> Self {
        let subtotal = cart_total(cart, prices);
        let delivery_fee = match method {
            DeliveryMethod::Delivery => delivery_fee,
            DeliveryMethod::Pickup => Decimal::ZERO,
        };
        Self {
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
        }
    }
}

/// `GHS 12.50`
pub fn format_ghs(amount: Decimal) -> String {
    format!("GHS {:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Level;

    fn topping(id: i64, price: i64) -> Topping {
        Topping {
            id,
            name: format!("Topping {}", id),
            price_ghs: Decimal::from(price),
            in_stock: true,
        }
    }

    fn line(unit: Decimal, topping_ids: Vec<i64>, quantity: u32) -> CartLine {
        CartLine {
            line_id: shared::util::new_line_id(),
            item_id: 1,
            item_name: "Item".into(),
            option_key: "regular".into(),
            option_label: "Regular".into(),
            variant_id: None,
            unit_price_ghs: unit,
            quantity,
            free_topping_id: None,
            topping_ids,
            sugar_level: Level::new(2),
            spice_level: None,
            note: String::new(),
        }
    }

    #[test]
    fn test_cart_total_example() {
        let toppings = vec![topping(8, 8)];
        let cart = vec![
            line(Decimal::from(35), vec![], 2),
            line(Decimal::from(50), vec![8], 1),
        ];
        assert_eq!(cart_total(&cart, &toppings), Decimal::from(128));
        assert_eq!(cart_count(&cart), 3);
    }

    #[test]
    fn test_free_topping_is_not_priced() {
        let toppings = vec![topping(3, 5), topping(4, 7)];
        let mut l = line(Decimal::from(30), vec![4], 2);
        l.free_topping_id = Some(3);
        assert_eq!(line_extra(&l, &toppings), Decimal::from(7));
        assert_eq!(line_total(&l, &toppings), Decimal::from(74));
    }

    #[test]
    fn test_unknown_topping_prices_zero() {
        let prices: HashMap<i64, Decimal> = HashMap::new();
        let l = line(Decimal::new(2550, 2), vec![99], 2);
        assert_eq!(line_total(&l, &prices), Decimal::from(51));
    }

    #[test]
    fn test_decimal_precision() {
        let toppings = vec![Topping {
            price_ghs: Decimal::new(150, 2),
            ..topping(1, 0)
        }];
        let cart = vec![line(Decimal::new(1099, 2), vec![1], 3)];
        // (10.99 + 1.50) * 3
        assert_eq!(cart_total(&cart, &toppings), Decimal::new(3747, 2));
    }

    #[test]
    fn test_totals_fee_only_for_delivery() {
        let cart = vec![line(Decimal::from(40), vec![], 1)];
        let fee = Decimal::from(10);
        let delivery = Totals::compute(&cart, &[] as &[Topping], DeliveryMethod::Delivery, fee);
        assert_eq!(delivery.total, Decimal::from(50));
        let pickup = Totals::compute(&cart, &[] as &[Topping], DeliveryMethod::Pickup, fee);
        assert_eq!(pickup.delivery_fee, Decimal::ZERO);
        assert_eq!(pickup.total, Decimal::from(40));
    }

    #[test]
    fn test_format_ghs() {
        assert_eq!(format_ghs(Decimal::from(128)), "GHS 128.00");
        assert_eq!(format_ghs(Decimal::new(125, 1)), "GHS 12.50");
    }

    #[test]
    fn test_empty_cart() {
        let cart: Vec<CartLine> = vec![];
        assert_eq!(cart_total(&cart, &Vec::<Topping>::new()), Decimal::ZERO);
        assert_eq!(cart_count(&cart), 0);
    }
}
