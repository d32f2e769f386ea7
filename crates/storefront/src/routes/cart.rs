//! Cart route handlers.
//!
//! All cart routes are keyed by the session's cart token, so they work for
//! guests and signed-in customers alike.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use animart_core::ProductId;

use crate::db::CartRepository;
use crate::error::AppError;
use crate::middleware::CartToken;
use crate::state::AppState;

/// Request body for adding an item to the cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: i32,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

/// Request body for setting a line quantity.
#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: i32,
}

/// Get the current cart.
///
/// # Errors
///
/// Returns `AppError::Database` if a query fails.
pub async fn show(
    State(state): State<AppState>,
    CartToken(token): CartToken,
) -> Result<Json<Value>, AppError> {
    let repo = CartRepository::new(state.pool());
    let cart_id = repo.find_or_create(&token).await?;
    let cart = repo.load(cart_id).await?;
    Ok(Json(json!({ "cart": cart })))
}

/// Add a product to the cart.
///
/// # Errors
///
/// - `AppError::Validation` if the quantity is not positive.
/// - `AppError::NotFound` if the product does not exist or is unpublished.
/// - `AppError::Conflict` if the requested quantity exceeds stock.
pub async fn add(
    State(state): State<AppState>,
    CartToken(token): CartToken,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<Value>, AppError> {
    if body.quantity < 1 {
        return Err(AppError::Validation(
            "quantity must be at least 1".to_string(),
        ));
    }

    let repo = CartRepository::new(state.pool());
    let cart_id = repo.find_or_create(&token).await?;
    repo.add_item(cart_id, ProductId::new(body.product_id), body.quantity)
        .await?;

    let cart = repo.load(cart_id).await?;
    Ok(Json(json!({ "cart": cart })))
}

/// Set the quantity of a cart line. A quantity of zero removes the line.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the line does not exist, or
/// `AppError::Database` if a query fails.
pub async fn update(
    State(state): State<AppState>,
    CartToken(token): CartToken,
    Path(product_id): Path<i32>,
    Json(body): Json<SetQuantityRequest>,
) -> Result<Json<Value>, AppError> {
    let repo = CartRepository::new(state.pool());
    let cart_id = repo.find_or_create(&token).await?;
    repo.set_item_quantity(cart_id, ProductId::new(product_id), body.quantity)
        .await?;

    let cart = repo.load(cart_id).await?;
    Ok(Json(json!({ "cart": cart })))
}

/// Remove a line from the cart.
///
/// # Errors
///
/// Returns `AppError::Database` if a query fails.
pub async fn remove(
    State(state): State<AppState>,
    CartToken(token): CartToken,
    Path(product_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let repo = CartRepository::new(state.pool());
    let cart_id = repo.find_or_create(&token).await?;
    repo.remove_item(cart_id, ProductId::new(product_id)).await?;

    let cart = repo.load(cart_id).await?;
    Ok(Json(json!({ "cart": cart })))
}

/// Clear the cart.
///
/// # Errors
///
/// Returns `AppError::Database` if a query fails.
pub async fn clear(
    State(state): State<AppState>,
    CartToken(token): CartToken,
) -> Result<Json<Value>, AppError> {
    let repo = CartRepository::new(state.pool());
    let cart_id = repo.find_or_create(&token).await?;
    repo.clear(cart_id).await?;

    let cart = repo.load(cart_id).await?;
    Ok(Json(json!({ "cart": cart })))
}
