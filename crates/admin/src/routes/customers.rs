//! Customer management route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use animart_core::{UserId, clamp_limit};

use crate::db::CustomerRepository;
use crate::db::customers::CustomerFilter;
use crate::models::CustomerActivity;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Default and maximum page size for customer listings.
const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

/// Maximum number of events in the activity feed.
const ACTIVITY_LIMIT: i64 = 20;

/// Query parameters for the customer listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerListQuery {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// List customers, newest first.
///
/// # Errors
///
/// Returns `AppError::Database` if the queries fail.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<CustomerListQuery>,
) -> Result<Json<Value>, AppError> {
    let filter = CustomerFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        is_active: query.is_active,
        page: query.page.unwrap_or(1),
        limit: clamp_limit(query.limit, DEFAULT_LIMIT, MAX_LIMIT),
    };

    let (customers, pagination) = CustomerRepository::new(state.pool()).list(&filter).await?;

    Ok(Json(json!({
        "customers": customers,
        "pagination": pagination,
    })))
}

/// Get one customer with order aggregates.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the customer does not exist.
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let customer = CustomerRepository::new(state.pool())
        .get(UserId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id} not found")))?;

    Ok(Json(json!({ "customer": customer })))
}

/// Recent activity for one customer: registration, last sign-in, orders,
/// and wishlist adds, merged and sorted newest first.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the customer does not exist.
pub async fn activity(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let repo = CustomerRepository::new(state.pool());

    // The feed of a missing customer would just be empty; 404 instead.
    repo.get(UserId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id} not found")))?;

    let events = repo.activity(UserId::new(id), ACTIVITY_LIMIT).await?;
    let activity: Vec<CustomerActivity> = events.into_iter().map(Into::into).collect();

    Ok(Json(json!({ "activity": activity })))
}

/// Suspend a customer account. Their sessions stop working at the next
/// sign-in; existing orders are untouched.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the customer does not exist.
pub async fn suspend(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    if admin.id == UserId::new(id) {
        return Err(AppError::Conflict(
            "cannot suspend your own account".to_owned(),
        ));
    }

    let customer = CustomerRepository::new(state.pool())
        .set_active(UserId::new(id), false)
        .await?;

    tracing::info!(customer_id = id, "customer suspended");

    Ok(Json(json!({ "customer": customer })))
}

/// Reactivate a suspended customer account.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the customer does not exist.
pub async fn activate(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let customer = CustomerRepository::new(state.pool())
        .set_active(UserId::new(id), true)
        .await?;

    tracing::info!(customer_id = id, "customer reactivated");

    Ok(Json(json!({ "customer": customer })))
}
