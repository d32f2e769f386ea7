//! Admin view of products.
//!
//! Unlike the storefront view, this exposes every status and the raw flags,
//! since the whole point of the admin panel is editing unpublished rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use animart_core::{AnimeId, CategoryId, ProductId, ProductStatus};

/// A product as managed in the admin panel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProduct {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    pub discount_percent: i32,
    pub stock: i32,
    pub status: ProductStatus,
    pub category_id: CategoryId,
    pub category_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anime_id: Option<AnimeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anime_name: Option<String>,
    pub images: Vec<String>,
    pub is_featured: bool,
    pub is_new_arrival: bool,
    pub is_bestseller: bool,
    pub view_count: i64,
    pub rating_average: Decimal,
    pub rating_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
