//! Cart snapshot types and total calculation.
//!
//! Carts are owned by the shop API; the storefront only reads them. Any
//! numeric field may be missing or `null` in the API payload and counts as
//! zero in every calculation below.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::{CartId, ProductId};

/// A single line of a cart as returned by the shop API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Base unit price.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    /// Sale unit price; overrides `price` only when positive.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub sale_price: Option<Decimal>,
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl CartItem {
    /// Unit price used for totals: the sale price when positive, otherwise
    /// the base price. A missing base price is zero.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        match self.sale_price {
            Some(sale) if sale > Decimal::ZERO => sale,
            _ => self.price.unwrap_or(Decimal::ZERO),
        }
    }

    /// Quantity with a missing value read as zero.
    #[must_use]
    pub fn quantity_or_zero(&self) -> u32 {
        self.quantity.unwrap_or(0)
    }

    /// Effective unit price multiplied by quantity, saturating at the
    /// bounds of `Decimal`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        let price = self.effective_price();
        price
            .checked_mul(Decimal::from(self.quantity_or_zero()))
            .unwrap_or_else(|| saturated(price.is_sign_negative()))
    }
}

/// A user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(rename = "_id")]
    pub id: CartId,
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Number of line items (not the summed quantity).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of every line's total, saturating at the bounds of `Decimal`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(CartItem::line_total)
            .fold(Decimal::ZERO, |sum, line| {
                sum.checked_add(line)
                    .unwrap_or_else(|| saturated(line.is_sign_negative()))
            })
    }
}

const fn saturated(negative: bool) -> Decimal {
    if negative { Decimal::MIN } else { Decimal::MAX }
}

/// Total of an optional cart. An absent or empty cart totals zero.
#[must_use]
pub fn cart_total(cart: Option<&Cart>) -> Decimal {
    cart.map_or(Decimal::ZERO, Cart::total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: Option<i64>, sale_price: Option<i64>, quantity: Option<u32>) -> CartItem {
        CartItem {
            product_id: ProductId::new("p"),
            title: "Item".to_string(),
            image: None,
            price: price.map(Decimal::from),
            sale_price: sale_price.map(Decimal::from),
            quantity,
        }
    }

    fn cart(items: Vec<CartItem>) -> Cart {
        Cart {
            id: CartId::new("cart-1"),
            items,
        }
    }

    #[test]
    fn test_effective_price_prefers_positive_sale_price() {
        assert_eq!(item(Some(5), Some(4), Some(1)).effective_price(), Decimal::from(4));
        assert_eq!(item(Some(10), Some(0), Some(1)).effective_price(), Decimal::from(10));
        assert_eq!(item(Some(10), None, Some(1)).effective_price(), Decimal::from(10));
        assert_eq!(item(Some(10), Some(-3), Some(1)).effective_price(), Decimal::from(10));
    }

    #[test]
    fn test_missing_price_and_quantity_count_as_zero() {
        assert_eq!(item(None, None, Some(3)).line_total(), Decimal::ZERO);
        assert_eq!(item(Some(7), None, None).line_total(), Decimal::ZERO);
    }

    #[test]
    fn test_total_of_mixed_cart() {
        let cart = cart(vec![item(Some(10), Some(0), Some(2)), item(Some(5), Some(4), Some(1))]);
        assert_eq!(cart.total(), Decimal::from(24));
        assert_eq!(format!("{:.2}", cart.total()), "24.00");
    }

    #[test]
    fn test_absent_or_empty_cart_totals_zero() {
        assert_eq!(cart_total(None), Decimal::ZERO);
        assert_eq!(cart_total(Some(&cart(Vec::new()))), Decimal::ZERO);
    }

    #[test]
    fn test_decimal_prices_sum_exactly() {
        let mut line = item(None, None, Some(3));
        line.price = Some(Decimal::new(1999, 2));
        assert_eq!(cart_total(Some(&cart(vec![line]))), Decimal::new(5997, 2));
    }

    #[test]
    fn test_oversized_line_saturates() {
        let json = r#"{
            "_id": "c1",
            "items": [{"productId": "p1", "price": 30000000000000000000, "quantity": 4000000000}]
        }"#;
        let cart: Cart = serde_json::from_str(json).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(cart.total(), Decimal::MAX);
        assert_eq!(cart_total(Some(&cart)), Decimal::MAX);
    }

    #[test]
    fn test_oversized_sum_saturates() {
        let big = item(Some(i64::MAX), None, Some(u32::MAX));
        let cart = cart(vec![big.clone(), big.clone(), big]);
        assert_eq!(cart.total(), Decimal::MAX);

        let owed = item(Some(i64::MIN), None, Some(u32::MAX));
        let cart = Cart {
            id: CartId::new("cart-2"),
            items: vec![owed.clone(), owed.clone(), owed],
        };
        assert_eq!(cart.total(), Decimal::MIN);
    }

    #[test]
    fn test_deserializes_api_payload_with_nulls() {
        let json = r#"{
            "_id": "c1",
            "items": [
                {"productId": "p1", "title": "Shirt", "image": "a.png", "price": 10, "salePrice": 0, "quantity": 2},
                {"productId": "p2", "title": "Hat", "price": null, "salePrice": 4, "quantity": 1},
                {"productId": "p3"}
            ]
        }"#;
        let cart: Cart = serde_json::from_str(json).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(cart.line_count(), 3);
        assert_eq!(cart.total(), Decimal::from(24));
        assert_eq!(cart.items.get(2).and_then(|i| i.quantity), None);
    }
}
