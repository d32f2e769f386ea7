//! Product model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use animart_core::{AnimeId, CategoryId, ProductId, final_price};

/// Stock falls to "low stock" at or below this many units.
pub const LOW_STOCK_THRESHOLD: i32 = 5;

/// Derived availability of a product, computed from `stock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Classify a stock level.
    #[must_use]
    pub const fn from_stock(stock: i32) -> Self {
        if stock <= 0 {
            Self::OutOfStock
        } else if stock <= LOW_STOCK_THRESHOLD {
            Self::LowStock
        } else {
            Self::InStock
        }
    }
}

/// Compact reference to a category or anime used as a filter dimension.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyRef {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

/// Aggregate review rating, stored redundantly on the product row.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub average: Decimal,
    pub count: i32,
}

/// A published product as served to storefront clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// List price.
    pub price: Decimal,
    /// Pre-sale price shown struck through, if any.
    pub original_price: Option<Decimal>,
    /// Percentage off the list price (0 = no discount).
    pub discount_percent: i32,
    /// Effective sale price: `price * (1 - discount/100)`, derived.
    pub final_price: Decimal,
    pub stock: i32,
    pub stock_status: StockStatus,
    pub category: TaxonomyRef,
    pub anime: Option<TaxonomyRef>,
    /// Ordered image URLs; the first is the primary image.
    pub images: Vec<String>,
    pub rating: Rating,
    pub is_featured: bool,
    pub is_new_arrival: bool,
    pub is_bestseller: bool,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Recompute the derived fields from the stored ones.
    ///
    /// Called by row conversions so `final_price` and `stock_status` can
    /// never drift from `price`/`discount_percent`/`stock`.
    pub fn refresh_derived(&mut self) {
        self.final_price = final_price(self.price, self.discount_percent);
        self.stock_status = StockStatus::from_stock(self.stock);
    }

    /// Convenience constructor for a taxonomy reference.
    #[must_use]
    pub fn category_ref(id: CategoryId, name: String, slug: String) -> TaxonomyRef {
        TaxonomyRef {
            id: id.as_i32(),
            name,
            slug,
        }
    }

    /// Convenience constructor for an anime reference.
    #[must_use]
    pub fn anime_ref(id: AnimeId, name: String, slug: String) -> TaxonomyRef {
        TaxonomyRef {
            id: id.as_i32(),
            name,
            slug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_classification() {
        assert_eq!(StockStatus::from_stock(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_stock(-1), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_stock(1), StockStatus::LowStock);
        assert_eq!(StockStatus::from_stock(5), StockStatus::LowStock);
        assert_eq!(StockStatus::from_stock(6), StockStatus::InStock);
    }
}
