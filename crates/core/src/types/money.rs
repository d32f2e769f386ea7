//! Money helpers.
//!
//! All prices and revenue figures use [`rust_decimal::Decimal`]; floating
//! point never touches a customer-visible amount.

use rust_decimal::Decimal;

/// Compute the effective sale price of a product.
///
/// `final_price = price * (1 - discount/100)` when a discount is set,
/// otherwise the list price unchanged. The result is rounded to cents.
///
/// # Examples
///
/// ```
/// use animart_core::final_price;
/// use rust_decimal::Decimal;
///
/// let price = Decimal::new(2000, 2); // 20.00
/// assert_eq!(final_price(price, 25), Decimal::new(1500, 2)); // 15.00
/// assert_eq!(final_price(price, 0), price);
/// ```
#[must_use]
pub fn final_price(price: Decimal, discount_percent: i32) -> Decimal {
    if discount_percent <= 0 {
        return price;
    }
    let discount = Decimal::from(discount_percent) / Decimal::from(100);
    (price * (Decimal::ONE - discount)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_discount() {
        let price = Decimal::new(1299, 2);
        assert_eq!(final_price(price, 0), price);
        assert_eq!(final_price(price, -10), price);
    }

    #[test]
    fn test_discount_applied() {
        let price = Decimal::new(5000, 2); // 50.00
        assert_eq!(final_price(price, 10), Decimal::new(4500, 2)); // 45.00
        assert_eq!(final_price(price, 50), Decimal::new(2500, 2)); // 25.00
    }

    #[test]
    fn test_discount_rounds_to_cents() {
        let price = Decimal::new(999, 2); // 9.99
        // 9.99 * 0.67 = 6.6933 -> 6.69
        assert_eq!(final_price(price, 33), Decimal::new(669, 2));
    }

    #[test]
    fn test_full_discount() {
        let price = Decimal::new(1500, 2);
        assert_eq!(final_price(price, 100), Decimal::ZERO.round_dp(2));
    }
}
