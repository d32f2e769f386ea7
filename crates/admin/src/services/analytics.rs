//! Dashboard assembly: windowed aggregates, percent changes, and
//! zero-filled daily series.

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use animart_core::OrderStatus;

use crate::db::{AnalyticsRepository, DailySales, DailySignups, RepositoryError};

/// How far a product may sink before the dashboard flags it.
const LOW_STOCK_THRESHOLD: i32 = 5;
const LOW_STOCK_LIMIT: i64 = 10;

/// Default and cap for the top-N category and product rankings.
pub const DEFAULT_RANKING_LIMIT: i64 = 5;
pub const MAX_RANKING_LIMIT: i64 = 50;

/// A reporting window measured in whole days ending now.
///
/// Only a fixed set of widths is accepted; anything else falls back to
/// the default of 30 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    days: u16,
}

impl TimeWindow {
    pub const ALLOWED: [u16; 4] = [7, 30, 90, 365];

    /// Accepts 7, 30, 90 or 365; anything else becomes 30.
    #[must_use]
    pub fn from_days(days: u16) -> Self {
        if Self::ALLOWED.contains(&days) {
            Self { days }
        } else {
            Self::default()
        }
    }

    #[must_use]
    pub const fn days(self) -> u16 {
        self.days
    }

    /// Start of the current window.
    #[must_use]
    pub fn start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - chrono::Duration::days(i64::from(self.days))
    }

    /// Start of the window immediately preceding this one.
    #[must_use]
    pub fn previous_start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - chrono::Duration::days(2 * i64::from(self.days))
    }

    /// First calendar day of a daily series ending today, sized so the
    /// series has exactly `days` entries.
    #[must_use]
    pub fn first_day(self, now: DateTime<Utc>) -> NaiveDate {
        now.date_naive() - chrono::Duration::days(i64::from(self.days) - 1)
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self { days: 30 }
    }
}

/// KPI block for the current window versus the one before it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub days: u16,
    pub revenue: MetricCard,
    pub orders: MetricCard,
    pub new_customers: MetricCard,
    pub average_order_value: MetricCard,
}

/// A headline number plus its change versus the previous window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricCard {
    pub value: Decimal,
    pub change: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRevenueEntry {
    pub category_id: i32,
    pub name: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPoint {
    pub date: NaiveDate,
    pub signups: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEntry {
    pub status: OrderStatus,
    pub count: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AovPoint {
    pub date: NaiveDate,
    pub average_order_value: Decimal,
    pub orders: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProductEntry {
    pub product_id: i32,
    pub name: String,
    pub image: Option<String>,
    pub stock: i32,
    pub units: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockEntry {
    pub id: i32,
    pub name: String,
    pub stock: i32,
}

/// Computes dashboard payloads for one window.
pub struct AnalyticsService<'a> {
    repo: AnalyticsRepository<'a>,
}

impl<'a> AnalyticsService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            repo: AnalyticsRepository::new(pool),
        }
    }

    /// KPI block for `window`, compared against the window of equal width
    /// immediately before it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any underlying query fails.
    pub async fn stats(&self, window: TimeWindow) -> Result<DashboardStats, RepositoryError> {
        let now = Utc::now();
        let start = window.start(now);
        let prev_start = window.previous_start(now);

        let current = self.repo.sales_summary(start, now).await?;
        let previous = self.repo.sales_summary(prev_start, start).await?;

        let customers = self.repo.new_customers(start, now).await?;
        let prev_customers = self.repo.new_customers(prev_start, start).await?;

        let aov = average_order_value(current.revenue, current.orders);
        let prev_aov = average_order_value(previous.revenue, previous.orders);

        Ok(DashboardStats {
            days: window.days(),
            revenue: MetricCard {
                value: current.revenue,
                change: percent_change(current.revenue, previous.revenue),
            },
            orders: MetricCard {
                value: Decimal::from(current.orders),
                change: percent_change(
                    Decimal::from(current.orders),
                    Decimal::from(previous.orders),
                ),
            },
            new_customers: MetricCard {
                value: Decimal::from(customers),
                change: percent_change(Decimal::from(customers), Decimal::from(prev_customers)),
            },
            average_order_value: MetricCard {
                value: aov,
                change: percent_change(aov, prev_aov),
            },
        })
    }

    /// Revenue per category over `window`, highest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revenue_by_category(
        &self,
        window: TimeWindow,
        limit: i64,
    ) -> Result<Vec<CategoryRevenueEntry>, RepositoryError> {
        let rows = self
            .repo
            .revenue_by_category(window.start(Utc::now()), limit)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| CategoryRevenueEntry {
                category_id: r.category_id,
                name: r.name,
                revenue: r.revenue,
            })
            .collect())
    }

    /// Signups per calendar day over `window`; the series always has
    /// exactly `window.days()` entries with gaps zero-filled.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn customer_growth(
        &self,
        window: TimeWindow,
    ) -> Result<Vec<GrowthPoint>, RepositoryError> {
        let now = Utc::now();
        let first = window.first_day(now);
        let rows = self.repo.daily_signups(window.start(now)).await?;
        Ok(fill_signup_series(first, now.date_naive(), &rows))
    }

    /// Order count and revenue per status over `window`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn order_status(
        &self,
        window: TimeWindow,
    ) -> Result<Vec<StatusEntry>, RepositoryError> {
        let rows = self.repo.status_breakdown(window.start(Utc::now())).await?;
        Ok(rows
            .into_iter()
            .map(|r| StatusEntry {
                status: r.status,
                count: r.count,
                revenue: r.revenue,
            })
            .collect())
    }

    /// Per-day mean order value over `window`, zero-filled to exactly
    /// `window.days()` entries. Cancelled and refunded orders are excluded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn aov_trend(&self, window: TimeWindow) -> Result<Vec<AovPoint>, RepositoryError> {
        let now = Utc::now();
        let first = window.first_day(now);
        let rows = self.repo.daily_sales(window.start(now)).await?;
        Ok(fill_aov_series(first, now.date_naive(), &rows))
    }

    /// Best-selling products by revenue over `window`, with live catalog
    /// metadata attached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_products(
        &self,
        window: TimeWindow,
        limit: i64,
    ) -> Result<Vec<TopProductEntry>, RepositoryError> {
        let rows = self
            .repo
            .top_products(window.start(Utc::now()), limit)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| TopProductEntry {
                product_id: r.product_id,
                name: r.name,
                image: r.image,
                stock: r.stock,
                units: r.units,
                revenue: r.revenue,
            })
            .collect())
    }

    /// Published products running low on stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn low_stock(&self) -> Result<Vec<LowStockEntry>, RepositoryError> {
        let rows = self
            .repo
            .low_stock(LOW_STOCK_THRESHOLD, LOW_STOCK_LIMIT)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| LowStockEntry {
                id: r.id,
                name: r.name,
                stock: r.stock,
            })
            .collect())
    }
}

/// Mean order value, zero when the window saw no orders.
#[must_use]
pub fn average_order_value(revenue: Decimal, orders: i64) -> Decimal {
    if orders == 0 {
        Decimal::ZERO
    } else {
        (revenue / Decimal::from(orders)).round_dp(2)
    }
}

/// Render the change from `previous` to `current` as a signed percentage.
///
/// Growth from a zero baseline reads as "+100%", a flat zero baseline as
/// "0%", and everything else as a one-decimal percentage with an explicit
/// sign on gains.
#[must_use]
pub fn percent_change(current: Decimal, previous: Decimal) -> String {
    if previous.is_zero() {
        return if current.is_zero() {
            "0%".to_owned()
        } else {
            "+100%".to_owned()
        };
    }

    let change = ((current - previous) / previous * Decimal::from(100)).round_dp(1);
    if change.is_sign_negative() {
        format!("{change}%")
    } else {
        format!("+{change}%")
    }
}

/// Expand sparse per-day signup rows into a dense series from `start` to
/// `end` inclusive, zero on days with no signups.
#[must_use]
pub fn fill_signup_series(
    start: NaiveDate,
    end: NaiveDate,
    rows: &[DailySignups],
) -> Vec<GrowthPoint> {
    each_day(start, end)
        .map(|date| GrowthPoint {
            date,
            signups: rows.iter().find(|r| r.day == date).map_or(0, |r| r.signups),
        })
        .collect()
}

/// Expand sparse per-day sales rows into a dense mean-order-value series
/// from `start` to `end` inclusive, zero on days with no orders.
#[must_use]
pub fn fill_aov_series(start: NaiveDate, end: NaiveDate, rows: &[DailySales]) -> Vec<AovPoint> {
    each_day(start, end)
        .map(|date| {
            rows.iter().find(|r| r.day == date).map_or_else(
                || AovPoint {
                    date,
                    average_order_value: Decimal::ZERO,
                    orders: 0,
                },
                |r| AovPoint {
                    date,
                    average_order_value: average_order_value(r.revenue, r.orders),
                    orders: r.orders,
                },
            )
        })
        .collect()
}

fn each_day(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(start), |day| day.checked_add_days(Days::new(1)))
        .take_while(move |day| *day <= end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn window_accepts_known_widths() {
        assert_eq!(TimeWindow::from_days(7).days(), 7);
        assert_eq!(TimeWindow::from_days(365).days(), 365);
    }

    #[test]
    fn window_falls_back_to_default() {
        assert_eq!(TimeWindow::from_days(14).days(), 30);
        assert_eq!(TimeWindow::from_days(0).days(), 30);
    }

    #[test]
    fn percent_change_from_zero_baseline() {
        assert_eq!(percent_change(dec!(10), dec!(0)), "+100%");
        assert_eq!(percent_change(dec!(0), dec!(0)), "0%");
    }

    #[test]
    fn percent_change_signed_with_one_decimal() {
        assert_eq!(percent_change(dec!(15), dec!(10)), "+50.0%");
        assert_eq!(percent_change(dec!(5), dec!(10)), "-50.0%");
    }

    #[test]
    fn average_order_value_handles_empty_window() {
        assert_eq!(average_order_value(dec!(0), 0), Decimal::ZERO);
        assert_eq!(average_order_value(dec!(100), 3), dec!(33.33));
    }

    #[test]
    fn signup_series_has_exactly_window_days() {
        // Signups on day 1 and day 5 of a 7-day window.
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let rows = vec![
            DailySignups {
                day: start,
                signups: 2,
            },
            DailySignups {
                day: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
                signups: 1,
            },
        ];

        let series = fill_signup_series(start, end, &rows);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].signups, 2);
        assert_eq!(series[4].signups, 1);
        for i in [1, 2, 3, 5, 6] {
            assert_eq!(series[i].signups, 0, "day {i} should be zero-filled");
        }
    }

    #[test]
    fn aov_series_zero_fills_gaps() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let rows = vec![
            DailySales {
                day: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
                revenue: dec!(40),
                orders: 2,
            },
            DailySales {
                day: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
                revenue: dec!(15),
                orders: 1,
            },
        ];

        let series = fill_aov_series(start, end, &rows);
        assert_eq!(series.len(), 4);
        assert_eq!(series[0].average_order_value, Decimal::ZERO);
        assert_eq!(series[1].average_order_value, dec!(20));
        assert_eq!(series[2].orders, 0);
        assert_eq!(series[3].average_order_value, dec!(15));
    }
}
