//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use animart_core::clamp_limit;

use crate::db::products::{ProductFilter, ProductRepository, ProductSort};
use crate::error::AppError;
use crate::state::AppState;

/// Default and maximum page size for product listings.
const DEFAULT_LIMIT: u32 = 12;
const MAX_LIMIT: u32 = 60;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub category: Option<String>,
    pub anime: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// List published products with filters, search, sort, and pagination.
///
/// # Errors
///
/// Returns `AppError::Database` if the queries fail.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Value>, AppError> {
    let filter = ProductFilter {
        category: query.category,
        anime: query.anime,
        min_price: query.min_price,
        max_price: query.max_price,
        search: query.search.filter(|s| !s.trim().is_empty()),
        sort: ProductSort::parse(query.sort_by.as_deref()),
        page: query.page.unwrap_or(1),
        limit: clamp_limit(query.limit, DEFAULT_LIMIT, MAX_LIMIT),
    };

    let (products, pagination) = ProductRepository::new(state.pool()).list(&filter).await?;

    Ok(Json(json!({
        "products": products,
        "pagination": pagination,
    })))
}

/// Get a published product by slug.
///
/// Bumps the view counter in the background; a counter failure never fails
/// the request.
///
/// # Errors
///
/// Returns `AppError::NotFound` if no published product has this slug, or
/// `AppError::Database` if the query fails.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, AppError> {
    let product = ProductRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product '{slug}' not found")))?;

    let pool = state.pool().clone();
    let product_id = product.id;
    tokio::spawn(async move {
        if let Err(e) = ProductRepository::new(&pool)
            .increment_view_count(product_id)
            .await
        {
            tracing::warn!(product_id = product_id.as_i32(), error = %e, "view count update failed");
        }
    });

    Ok(Json(json!({ "product": product })))
}
