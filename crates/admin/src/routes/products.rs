//! Product management route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use animart_core::{ProductId, ProductStatus, clamp_limit};

use crate::db::ProductRepository;
use crate::db::products::{AdminProductFilter, NewProduct, ProductPatch};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Default and maximum page size for product listings.
const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub status: Option<ProductStatus>,
    pub category_id: Option<i32>,
    pub search: Option<String>,
    pub stock_min: Option<i32>,
    pub stock_max: Option<i32>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub discount_percent: i32,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub status: ProductStatus,
    pub category_id: i32,
    pub anime_id: Option<i32>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Request body for a partial product update.
///
/// Double-optional fields distinguish "leave alone" (absent) from "clear"
/// (explicit null).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[serde(default, with = "serde_double_option")]
    pub original_price: Option<Option<Decimal>>,
    pub discount_percent: Option<i32>,
    pub status: Option<ProductStatus>,
    pub category_id: Option<i32>,
    #[serde(default, with = "serde_double_option")]
    pub anime_id: Option<Option<i32>>,
    pub images: Option<Vec<String>>,
    pub is_featured: Option<bool>,
    pub is_new_arrival: Option<bool>,
    pub is_bestseller: Option<bool>,
}

/// Direction of a stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockOperation {
    Increase,
    Decrease,
}

/// Request body for a stock adjustment.
#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    /// Number of units to add or remove; must be positive.
    pub quantity: i32,
    pub operation: StockOperation,
}

impl AdjustStockRequest {
    /// Signed change to apply to the current stock.
    const fn delta(&self) -> i32 {
        match self.operation {
            StockOperation::Increase => self.quantity,
            StockOperation::Decrease => -self.quantity,
        }
    }
}

/// List products across all statuses.
///
/// # Errors
///
/// Returns `AppError::Database` if the queries fail.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Value>, AppError> {
    let filter = AdminProductFilter {
        status: query.status,
        category_id: query.category_id,
        search: query.search.filter(|s| !s.trim().is_empty()),
        stock_min: query.stock_min,
        stock_max: query.stock_max,
        page: query.page.unwrap_or(1),
        limit: clamp_limit(query.limit, DEFAULT_LIMIT, MAX_LIMIT),
    };

    let (products, pagination) = ProductRepository::new(state.pool()).list(&filter).await?;

    Ok(Json(json!({
        "products": products,
        "pagination": pagination,
    })))
}

/// Get one product by id, whatever its status.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the product does not exist.
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id} not found")))?;

    Ok(Json(json!({ "product": product })))
}

/// Create a product. The slug is derived from the name.
///
/// # Errors
///
/// - `AppError::Validation` for a non-positive price or negative stock.
/// - `AppError::Conflict` for a slug collision or unknown category/anime id.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    validate_price_and_stock(body.price, body.stock)?;

    let new = NewProduct {
        name: body.name,
        description: body.description,
        price: body.price,
        original_price: body.original_price,
        discount_percent: body.discount_percent,
        stock: body.stock,
        status: body.status,
        category_id: body.category_id,
        anime_id: body.anime_id,
        images: body.images,
    };

    let product = ProductRepository::new(state.pool()).create(&new).await?;

    tracing::info!(product_id = %product.id, slug = %product.slug, "product created");

    Ok((StatusCode::CREATED, Json(json!({ "product": product }))))
}

/// Apply a partial update to a product.
///
/// # Errors
///
/// - `AppError::Validation` for an empty patch or invalid price.
/// - `AppError::NotFound` if the product does not exist.
/// - `AppError::Conflict` for a slug collision or unknown category/anime id.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<Value>, AppError> {
    if let Some(price) = body.price {
        validate_price_and_stock(price, 0)?;
    }

    let patch = ProductPatch {
        name: body.name,
        description: body.description,
        price: body.price,
        original_price: body.original_price,
        discount_percent: body.discount_percent,
        status: body.status,
        category_id: body.category_id,
        anime_id: body.anime_id,
        images: body.images,
        is_featured: body.is_featured,
        is_new_arrival: body.is_new_arrival,
        is_bestseller: body.is_bestseller,
    };

    let product = ProductRepository::new(state.pool())
        .update(ProductId::new(id), &patch)
        .await?;

    Ok(Json(json!({ "product": product })))
}

/// Delete a product.
///
/// Past order lines keep their name and price snapshots; only their product
/// reference goes null.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the product does not exist.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;

    tracing::info!(product_id = id, "product deleted");

    Ok(Json(json!({ "message": "product deleted" })))
}

/// Adjust stock by a positive quantity, up or down.
///
/// # Errors
///
/// - `AppError::Validation` if the quantity is not positive.
/// - `AppError::NotFound` if the product does not exist.
/// - `AppError::Conflict` if a decrease would take stock below zero.
pub async fn adjust_stock(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(body): Json<AdjustStockRequest>,
) -> Result<Json<Value>, AppError> {
    if body.quantity <= 0 {
        return Err(AppError::Validation("quantity must be positive".to_owned()));
    }

    let stock = ProductRepository::new(state.pool())
        .adjust_stock(ProductId::new(id), body.delta())
        .await?;

    Ok(Json(json!({ "stock": stock })))
}

fn validate_price_and_stock(price: Decimal, stock: i32) -> Result<(), AppError> {
    if price <= Decimal::ZERO {
        return Err(AppError::Validation("price must be positive".to_owned()));
    }
    if stock < 0 {
        return Err(AppError::Validation("stock cannot be negative".to_owned()));
    }
    Ok(())
}

/// Deserializes a field where absence, null, and a value are three states.
mod serde_double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_field_leaves_product_alone() {
        let body: UpdateProductRequest = serde_json::from_str(r#"{"name": "Mug"}"#).unwrap();
        assert_eq!(body.name.as_deref(), Some("Mug"));
        assert!(body.anime_id.is_none());
    }

    #[test]
    fn explicit_null_clears_the_field() {
        let body: UpdateProductRequest = serde_json::from_str(r#"{"animeId": null}"#).unwrap();
        assert_eq!(body.anime_id, Some(None));
    }

    #[test]
    fn explicit_value_sets_the_field() {
        let body: UpdateProductRequest = serde_json::from_str(r#"{"animeId": 3}"#).unwrap();
        assert_eq!(body.anime_id, Some(Some(3)));
    }

    #[test]
    fn stock_operation_maps_to_signed_delta() {
        let body: AdjustStockRequest =
            serde_json::from_str(r#"{"quantity": 3, "operation": "decrease"}"#).unwrap();
        assert_eq!(body.delta(), -3);

        let body: AdjustStockRequest =
            serde_json::from_str(r#"{"quantity": 5, "operation": "increase"}"#).unwrap();
        assert_eq!(body.delta(), 5);
    }

    #[test]
    fn unknown_stock_operation_rejected() {
        let result = serde_json::from_str::<AdjustStockRequest>(
            r#"{"quantity": 1, "operation": "teleport"}"#,
        );
        assert!(result.is_err());
    }
}
