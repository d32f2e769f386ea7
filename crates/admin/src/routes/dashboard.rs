//! Dashboard route handlers.
//!
//! Every aggregate endpoint takes a `days` window (7/30/90/365, default
//! 30) and caches its payload per window for a minute, so a dashboard
//! polling every few seconds costs one set of queries per minute.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::services::{AnalyticsService, TimeWindow};
use crate::services::analytics::{DEFAULT_RANKING_LIMIT, MAX_RANKING_LIMIT};
use crate::state::AppState;

/// Query parameters shared by the dashboard endpoints.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub days: Option<u16>,
    /// Top-N cap for the ranking endpoints; ignored elsewhere.
    pub limit: Option<i64>,
}

impl DashboardQuery {
    fn window(&self) -> TimeWindow {
        TimeWindow::from_days(self.days.unwrap_or(30))
    }

    fn ranking_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_RANKING_LIMIT)
            .clamp(1, MAX_RANKING_LIMIT)
    }
}

/// Serve `compute` through the per-window payload cache. The future is
/// only awaited on a cache miss.
async fn cached<F, T>(state: &AppState, key: String, compute: F) -> Result<Json<Value>, AppError>
where
    F: Future<Output = Result<T, AppError>>,
    T: Serialize,
{
    if let Some(hit) = state.dashboard_cache().get(&key).await {
        return Ok(Json(hit));
    }

    let payload = serde_json::to_value(compute.await?)
        .map_err(|e| AppError::Internal(format!("failed to serialize dashboard payload: {e}")))?;
    state.dashboard_cache().insert(key, payload.clone()).await;

    Ok(Json(payload))
}

/// KPI block: revenue, orders, new customers, and average order value,
/// each with its change versus the preceding window.
///
/// # Errors
///
/// Returns `AppError::Database` if the aggregate queries fail.
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Value>, AppError> {
    let window = query.window();
    cached(&state, format!("stats:{}", window.days()), async {
        let stats = AnalyticsService::new(state.pool()).stats(window).await?;
        Ok(json!({ "stats": stats }))
    })
    .await
}

/// Revenue per category, highest first.
///
/// # Errors
///
/// Returns `AppError::Database` if the query fails.
pub async fn revenue_by_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Value>, AppError> {
    let window = query.window();
    let limit = query.ranking_limit();
    cached(
        &state,
        format!("revenue-by-category:{}:{limit}", window.days()),
        async {
            let categories = AnalyticsService::new(state.pool())
                .revenue_by_category(window, limit)
                .await?;
            Ok(json!({ "categories": categories }))
        },
    )
    .await
}

/// Signups per calendar day, zero-filled to exactly `days` entries.
///
/// # Errors
///
/// Returns `AppError::Database` if the query fails.
pub async fn customer_growth(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Value>, AppError> {
    let window = query.window();
    cached(
        &state,
        format!("customer-growth:{}", window.days()),
        async {
            let growth = AnalyticsService::new(state.pool())
                .customer_growth(window)
                .await?;
            Ok(json!({ "days": window.days(), "growth": growth }))
        },
    )
    .await
}

/// Order count and revenue per status within the window.
///
/// # Errors
///
/// Returns `AppError::Database` if the query fails.
pub async fn order_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Value>, AppError> {
    let window = query.window();
    cached(&state, format!("order-status:{}", window.days()), async {
        let statuses = AnalyticsService::new(state.pool())
            .order_status(window)
            .await?;
        Ok(json!({ "statuses": statuses }))
    })
    .await
}

/// Per-day mean order value, zero-filled to exactly `days` entries.
///
/// # Errors
///
/// Returns `AppError::Database` if the query fails.
pub async fn aov_trend(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Value>, AppError> {
    let window = query.window();
    cached(&state, format!("aov-trend:{}", window.days()), async {
        let trend = AnalyticsService::new(state.pool()).aov_trend(window).await?;
        Ok(json!({ "days": window.days(), "trend": trend }))
    })
    .await
}

/// Best-selling products by revenue, with live name/image/stock.
///
/// # Errors
///
/// Returns `AppError::Database` if the query fails.
pub async fn top_products(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Value>, AppError> {
    let window = query.window();
    let limit = query.ranking_limit();
    cached(
        &state,
        format!("top-products:{}:{limit}", window.days()),
        async {
            let products = AnalyticsService::new(state.pool())
                .top_products(window, limit)
                .await?;
            Ok(json!({ "products": products }))
        },
    )
    .await
}

/// Published products running low on stock.
///
/// # Errors
///
/// Returns `AppError::Database` if the query fails.
pub async fn low_stock(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Value>, AppError> {
    cached(&state, "low-stock".to_owned(), async {
        let products = AnalyticsService::new(state.pool()).low_stock().await?;
        Ok(json!({ "products": products }))
    })
    .await
}
