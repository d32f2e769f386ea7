//! Analytics repository: aggregate queries behind the dashboard.
//!
//! Revenue only counts orders that are still standing: cancelled and
//! refunded orders are excluded everywhere except the per-status
//! breakdown, which reports every status.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use animart_core::OrderStatus;

use super::RepositoryError;

/// Revenue and order count over a window.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct SalesSummary {
    pub revenue: Decimal,
    pub orders: i64,
}

/// Revenue and order count for a single day.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct DailySales {
    pub day: NaiveDate,
    pub revenue: Decimal,
    pub orders: i64,
}

/// Account signups for a single day.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct DailySignups {
    pub day: NaiveDate,
    pub signups: i64,
}

/// Revenue attributed to one category.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRevenue {
    pub category_id: i32,
    pub name: String,
    pub revenue: Decimal,
}

/// Units sold and revenue for one product, with live catalog metadata.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TopProduct {
    pub product_id: i32,
    pub name: String,
    pub image: Option<String>,
    pub stock: i32,
    pub units: i64,
    pub revenue: Decimal,
}

/// A product running low on stock.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LowStockProduct {
    pub id: i32,
    pub name: String,
    pub stock: i32,
}

/// Order count and revenue for one status.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct StatusBreakdown {
    pub status: OrderStatus,
    pub count: i64,
    pub revenue: Decimal,
}

const REVENUE_FILTER: &str = "o.status NOT IN ('cancelled', 'refunded')";

/// Repository for dashboard aggregates.
pub struct AnalyticsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AnalyticsRepository<'a> {
    /// Create a new analytics repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Revenue and order count for orders created in `[since, until)`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sales_summary(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<SalesSummary, RepositoryError> {
        let summary = sqlx::query_as::<_, SalesSummary>(&format!(
            "SELECT COALESCE(SUM(o.total), 0) AS revenue, COUNT(*) AS orders
             FROM shop.shop_order o
             WHERE o.created_at >= $1 AND o.created_at < $2 AND {REVENUE_FILTER}"
        ))
        .bind(since)
        .bind(until)
        .fetch_one(self.pool)
        .await?;

        Ok(summary)
    }

    /// Number of accounts created in `[since, until)`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn new_customers(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar(
            "SELECT COUNT(*) FROM shop.shop_user
             WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(since)
        .bind(until)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Per-day revenue and order count since `since`. Days with no orders
    /// are absent; the caller zero-fills the series.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn daily_sales(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailySales>, RepositoryError> {
        let rows = sqlx::query_as::<_, DailySales>(&format!(
            "SELECT (o.created_at AT TIME ZONE 'UTC')::date AS day,
                    COALESCE(SUM(o.total), 0) AS revenue,
                    COUNT(*) AS orders
             FROM shop.shop_order o
             WHERE o.created_at >= $1 AND {REVENUE_FILTER}
             GROUP BY day
             ORDER BY day"
        ))
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Per-day account signups since `since`. Days with no signups are
    /// absent; the caller zero-fills the series.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn daily_signups(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailySignups>, RepositoryError> {
        let rows = sqlx::query_as::<_, DailySignups>(
            "SELECT (created_at AT TIME ZONE 'UTC')::date AS day,
                    COUNT(*) AS signups
             FROM shop.shop_user
             WHERE created_at >= $1
             GROUP BY day
             ORDER BY day",
        )
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Revenue per category of each order line's product since `since`,
    /// highest first.
    ///
    /// Lines whose product has been deleted carry no category and are
    /// dropped, like in [`top_products`](Self::top_products).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revenue_by_category(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<CategoryRevenue>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRevenue>(&format!(
            "SELECT c.id AS category_id, c.name,
                    SUM(oi.unit_price * oi.quantity) AS revenue
             FROM shop.order_item oi
             JOIN shop.shop_order o ON o.id = oi.order_id
             JOIN shop.product p ON p.id = oi.product_id
             JOIN shop.category c ON c.id = p.category_id
             WHERE o.created_at >= $1 AND {REVENUE_FILTER}
             GROUP BY c.id, c.name
             ORDER BY revenue DESC
             LIMIT $2"
        ))
        .bind(since)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Best-selling products by revenue since `since`, joined against live
    /// catalog metadata.
    ///
    /// Lines whose product has been deleted (null reference) are excluded;
    /// their snapshots no longer map to a manageable product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_products(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<TopProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, TopProduct>(&format!(
            "SELECT oi.product_id, p.name,
                    (p.images)[1] AS image, p.stock,
                    SUM(oi.quantity)::bigint AS units,
                    SUM(oi.unit_price * oi.quantity) AS revenue
             FROM shop.order_item oi
             JOIN shop.shop_order o ON o.id = oi.order_id
             JOIN shop.product p ON p.id = oi.product_id
             WHERE o.created_at >= $1 AND {REVENUE_FILTER}
             GROUP BY oi.product_id, p.id
             ORDER BY revenue DESC, units DESC
             LIMIT $2"
        ))
        .bind(since)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Published products at or below a stock threshold, emptiest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn low_stock(
        &self,
        threshold: i32,
        limit: i64,
    ) -> Result<Vec<LowStockProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, LowStockProduct>(
            "SELECT id, name, stock FROM shop.product
             WHERE status = 'published' AND stock <= $1
             ORDER BY stock ASC, name
             LIMIT $2",
        )
        .bind(threshold)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Order count and revenue per status for orders created since `since`.
    ///
    /// Every status appears here, including cancelled and refunded; the
    /// revenue column shows what each bucket is worth, not what was earned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn status_breakdown(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<StatusBreakdown>, RepositoryError> {
        let rows = sqlx::query_as::<_, StatusBreakdown>(
            "SELECT status, COUNT(*) AS count, COALESCE(SUM(total), 0) AS revenue
             FROM shop.shop_order
             WHERE created_at >= $1
             GROUP BY status
             ORDER BY count DESC",
        )
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
