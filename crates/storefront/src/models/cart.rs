//! Shopping cart model.

use rust_decimal::Decimal;
use serde::Serialize;

use animart_core::{CartId, ProductId};

use super::product::StockStatus;

/// One line of a cart, joined against the live product row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
    /// Effective unit price at display time (discount applied).
    pub unit_price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
    pub stock_status: StockStatus,
}

/// A cart with its lines and derived totals.
///
/// Guest carts are keyed by a session token; once the visitor signs in the
/// cart is attached to their user id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub items: Vec<CartLine>,
    pub item_count: i32,
    pub subtotal: Decimal,
}

impl Cart {
    /// Build a cart from its lines, computing totals.
    #[must_use]
    pub fn from_lines(id: CartId, items: Vec<CartLine>) -> Self {
        let item_count = items.iter().map(|l| l.quantity).sum();
        let subtotal = items.iter().map(|l| l.line_total).sum();
        Self {
            id,
            items,
            item_count,
            subtotal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i32, unit_price: Decimal, quantity: i32) -> CartLine {
        CartLine {
            product_id: ProductId::new(product_id),
            name: format!("product-{product_id}"),
            slug: format!("product-{product_id}"),
            image: None,
            unit_price,
            quantity,
            line_total: unit_price * Decimal::from(quantity),
            stock_status: StockStatus::InStock,
        }
    }

    #[test]
    fn test_totals_from_lines() {
        let cart = Cart::from_lines(
            CartId::new(1),
            vec![
                line(1, Decimal::new(5000, 2), 1), // 50.00
                line(2, Decimal::new(3500, 2), 2), // 70.00
            ],
        );
        assert_eq!(cart.item_count, 3);
        assert_eq!(cart.subtotal, Decimal::new(12000, 2));
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::from_lines(CartId::new(1), vec![]);
        assert_eq!(cart.item_count, 0);
        assert_eq!(cart.subtotal, Decimal::ZERO);
    }
}
