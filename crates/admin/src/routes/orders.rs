//! Order management route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use animart_core::{OrderId, OrderStatus, PaymentStatus, clamp_limit};

use crate::db::OrderRepository;
use crate::db::orders::AdminOrderFilter;
use crate::models::OrderStatusSummary;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Default and maximum page size for order listings.
const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

/// Query parameters for the order listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub search: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Request body for a status change.
///
/// The status arrives as a plain string so an unknown value surfaces as a
/// 400 with the parse message, not a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: String,
    pub tracking_number: Option<String>,
    pub admin_notes: Option<String>,
}

/// List orders, newest first, with a per-status count/revenue summary
/// for the same filters (minus the status filter itself).
///
/// # Errors
///
/// Returns `AppError::Database` if the queries fail.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Value>, AppError> {
    let filter = AdminOrderFilter {
        status: query.status,
        payment_status: query.payment_status,
        search: query.search.filter(|s| !s.trim().is_empty()),
        date_from: query.date_from,
        date_to: query.date_to,
        page: query.page.unwrap_or(1),
        limit: clamp_limit(query.limit, DEFAULT_LIMIT, MAX_LIMIT),
    };

    let repo = OrderRepository::new(state.pool());
    let (orders, pagination) = repo.list(&filter).await?;
    let summary: Vec<OrderStatusSummary> = repo
        .status_summary(&filter)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(json!({
        "orders": orders,
        "pagination": pagination,
        "summary": summary,
    })))
}

/// Get one order with its lines.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the order does not exist.
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let order = OrderRepository::new(state.pool())
        .get(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    Ok(Json(json!({ "order": order })))
}

/// Change an order's status.
///
/// Shipping an order stamps `shippedAt` and stores the tracking number;
/// when SMTP is configured the customer is notified, best-effort. Cancelling
/// or refunding puts the ordered units back in stock. The body may carry
/// `adminNotes`, stored on the order alongside the transition.
///
/// # Errors
///
/// - `AppError::Validation` if the status is not a known value.
/// - `AppError::NotFound` if the order does not exist.
/// - `AppError::Conflict` if the transition is not allowed from the order's
///   current status.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let status: OrderStatus = body
        .status
        .parse()
        .map_err(|e: animart_core::StatusParseError| AppError::Validation(e.to_string()))?;

    let order = OrderRepository::new(state.pool())
        .update_status(
            OrderId::new(id),
            status,
            body.tracking_number.as_deref(),
            body.admin_notes.as_deref(),
        )
        .await?;

    tracing::info!(
        order_number = %order.order_number,
        status = %order.status,
        "order status updated"
    );

    if order.status == OrderStatus::Shipped {
        notify_shipped(&state, &order);
    }

    Ok(Json(json!({ "order": order })))
}

/// Fire off the shipped notification without holding up the response.
fn notify_shipped(state: &AppState, order: &crate::models::AdminOrder) {
    let Some(email) = state.email().cloned() else {
        return;
    };
    let Some(to) = order.customer_email.clone() else {
        return;
    };
    let order_number = order.order_number.clone();
    let tracking = order.tracking_number.clone();

    tokio::spawn(async move {
        if let Err(e) = email
            .send_order_shipped(&to, &order_number, tracking.as_deref())
            .await
        {
            tracing::warn!(order_number, error = %e, "failed to send shipped email");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_value_fails_parse_not_deserialization() {
        let body: UpdateStatusRequest =
            serde_json::from_str(r#"{"status": "teleported"}"#).unwrap();
        let err = body.status.parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown status value: teleported");
    }

    #[test]
    fn status_body_carries_tracking_and_notes() {
        let body: UpdateStatusRequest = serde_json::from_str(
            r#"{"status": "shipped", "trackingNumber": "JP123", "adminNotes": "fragile"}"#,
        )
        .unwrap();
        assert_eq!(body.status.parse::<OrderStatus>(), Ok(OrderStatus::Shipped));
        assert_eq!(body.tracking_number.as_deref(), Some("JP123"));
        assert_eq!(body.admin_notes.as_deref(), Some("fragile"));
    }
}
