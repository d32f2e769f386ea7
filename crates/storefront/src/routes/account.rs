//! Account route handlers: profile, order history, and wishlist.
//!
//! Every handler here requires a signed-in customer via [`RequireUser`].

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use animart_core::{OrderId, ProductId, clamp_limit};

use crate::db::{OrderRepository, UserRepository};
use crate::error::AppError;
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Default and maximum page size for order history.
const DEFAULT_ORDER_LIMIT: u32 = 10;
const MAX_ORDER_LIMIT: u32 = 50;

/// Query parameters for paginated account listings.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Get the signed-in customer's profile.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` if the account behind the session no
/// longer exists.
pub async fn profile(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Json<Value>, AppError> {
    let user = UserRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_string()))?;

    Ok(Json(json!({ "user": user })))
}

/// List the signed-in customer's orders, newest first.
///
/// # Errors
///
/// Returns `AppError::Database` if a query fails.
pub async fn orders(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, AppError> {
    let (orders, pagination) = OrderRepository::new(state.pool())
        .list_for_user(
            current.id,
            query.page.unwrap_or(1),
            clamp_limit(query.limit, DEFAULT_ORDER_LIMIT, MAX_ORDER_LIMIT),
        )
        .await?;

    Ok(Json(json!({
        "orders": orders,
        "pagination": pagination,
    })))
}

/// Get one of the signed-in customer's orders.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the order does not exist or belongs to
/// someone else.
pub async fn order_detail(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let order = OrderRepository::new(state.pool())
        .get_for_user(OrderId::new(id), current.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    Ok(Json(json!({ "order": order })))
}

/// Cancel an order that has not yet shipped. Restocks its items.
///
/// # Errors
///
/// - `AppError::NotFound` if the order does not exist or belongs to someone
///   else.
/// - `AppError::Conflict` if the order is past the point of cancellation.
pub async fn cancel_order(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let order = OrderRepository::new(state.pool())
        .cancel(OrderId::new(id), current.id)
        .await?;

    Ok(Json(json!({ "order": order })))
}

/// List the signed-in customer's wishlist.
///
/// # Errors
///
/// Returns `AppError::Database` if the query fails.
pub async fn wishlist(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Json<Value>, AppError> {
    let products = UserRepository::new(state.pool())
        .wishlist(current.id)
        .await?;

    Ok(Json(json!({ "products": products })))
}

/// Add a product to the wishlist. Idempotent.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the product does not exist.
pub async fn wishlist_add(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(product_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    UserRepository::new(state.pool())
        .wishlist_add(current.id, ProductId::new(product_id))
        .await?;

    Ok(Json(json!({ "ok": true })))
}

/// Remove a product from the wishlist. Idempotent.
///
/// # Errors
///
/// Returns `AppError::Database` if the delete fails.
pub async fn wishlist_remove(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(product_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    UserRepository::new(state.pool())
        .wishlist_remove(current.id, ProductId::new(product_id))
        .await?;

    Ok(Json(json!({ "ok": true })))
}
