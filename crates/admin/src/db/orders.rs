//! Order repository: fulfillment management.
//!
//! Status changes go through the state machine in `animart_core`; an illegal
//! edge surfaces as a conflict, never a silent overwrite.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use animart_core::{OrderId, OrderStatus, Pagination, PaymentStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::{AdminOrder, AdminOrderItem, ShippingAddress};

const ORDER_COLUMNS: &str = r"
    o.id, o.order_number, o.user_id, u.email AS customer_email,
    trim(concat(u.first_name, ' ', u.last_name)) AS customer_name,
    o.status, o.payment_status, o.total, o.shipping_address,
    o.tracking_number, o.admin_notes, o.created_at, o.shipped_at, o.delivered_at
";

const ORDER_FROM: &str = r"
    FROM shop.shop_order o
    LEFT JOIN shop.shop_user u ON u.id = o.user_id
";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    order_number: String,
    user_id: Option<i32>,
    customer_email: Option<String>,
    customer_name: Option<String>,
    status: OrderStatus,
    payment_status: PaymentStatus,
    total: Decimal,
    shipping_address: Json<ShippingAddress>,
    tracking_number: Option<String>,
    admin_notes: Option<String>,
    created_at: DateTime<Utc>,
    shipped_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
}

impl OrderRow {
    fn into_order(self, items: Vec<AdminOrderItem>) -> AdminOrder {
        AdminOrder {
            id: OrderId::new(self.id),
            order_number: self.order_number,
            user_id: self.user_id.map(UserId::new),
            customer_email: self.customer_email,
            customer_name: self.customer_name.filter(|n| !n.is_empty()),
            status: self.status,
            payment_status: self.payment_status,
            items,
            total: self.total,
            shipping_address: self.shipping_address.0,
            tracking_number: self.tracking_number,
            admin_notes: self.admin_notes,
            created_at: self.created_at,
            shipped_at: self.shipped_at,
            delivered_at: self.delivered_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    order_id: i32,
    product_id: Option<i32>,
    name: String,
    unit_price: Decimal,
    quantity: i32,
}

impl From<OrderItemRow> for AdminOrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            product_id: row.product_id.map(ProductId::new),
            name: row.name,
            unit_price: row.unit_price,
            quantity: row.quantity,
        }
    }
}

/// Order count and revenue for one status, within a listing's filters.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct StatusSummary {
    pub status: OrderStatus,
    pub count: i64,
    pub revenue: Decimal,
}

/// Filters accepted by the admin order listing.
#[derive(Debug, Clone, Default)]
pub struct AdminOrderFilter {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    /// Case-insensitive substring over order number and customer email.
    pub search: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub page: u32,
    pub limit: u32,
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &AdminOrderFilter) {
    if let Some(status) = filter.status {
        qb.push(" AND o.status = ").push_bind(status);
    }
    if let Some(payment_status) = filter.payment_status {
        qb.push(" AND o.payment_status = ").push_bind(payment_status);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        qb.push(" AND (o.order_number ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR u.email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(from) = filter.date_from {
        qb.push(" AND o.created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.date_to {
        qb.push(" AND o.created_at <= ").push_bind(to);
    }
}

async fn fetch_items(
    pool: &PgPool,
    order_ids: &[i32],
) -> Result<Vec<OrderItemRow>, RepositoryError> {
    let rows = sqlx::query_as::<_, OrderItemRow>(
        "SELECT order_id, product_id, name, unit_price, quantity
         FROM shop.order_item
         WHERE order_id = ANY($1)
         ORDER BY id",
    )
    .bind(order_ids)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Repository for admin order management.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List orders, newest first, with pagination metadata.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn list(
        &self,
        filter: &AdminOrderFilter,
    ) -> Result<(Vec<AdminOrder>, Pagination), RepositoryError> {
        let mut count_qb = QueryBuilder::new(format!("SELECT COUNT(*) {ORDER_FROM} WHERE TRUE"));
        push_filters(&mut count_qb, filter);
        let total: i64 = count_qb.build_query_scalar().fetch_one(self.pool).await?;

        let pagination = Pagination::new(
            u64::try_from(total).unwrap_or_default(),
            filter.page,
            filter.limit,
        );

        let mut qb = QueryBuilder::new(format!("SELECT {ORDER_COLUMNS} {ORDER_FROM} WHERE TRUE"));
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY o.created_at DESC, o.id DESC");
        qb.push(" LIMIT ")
            .push_bind(i64::from(pagination.limit))
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let rows: Vec<OrderRow> = qb.build_query_as().fetch_all(self.pool).await?;

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut items: std::collections::HashMap<i32, Vec<AdminOrderItem>> =
            std::collections::HashMap::new();
        for item in fetch_items(self.pool, &ids).await? {
            items.entry(item.order_id).or_default().push(item.into());
        }

        let orders = rows
            .into_iter()
            .map(|row| {
                let own = items.remove(&row.id).unwrap_or_default();
                row.into_order(own)
            })
            .collect();

        Ok((orders, pagination))
    }

    /// Count and revenue per status for the orders a filter matches,
    /// ignoring the filter's own status so every bucket stays visible.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn status_summary(
        &self,
        filter: &AdminOrderFilter,
    ) -> Result<Vec<StatusSummary>, RepositoryError> {
        let unscoped = AdminOrderFilter {
            status: None,
            ..filter.clone()
        };

        let mut qb = QueryBuilder::new(format!(
            "SELECT o.status, COUNT(*) AS count, COALESCE(SUM(o.total), 0) AS revenue
             {ORDER_FROM} WHERE TRUE"
        ));
        push_filters(&mut qb, &unscoped);
        qb.push(" GROUP BY o.status ORDER BY count DESC");

        let rows: Vec<StatusSummary> = qb.build_query_as().fetch_all(self.pool).await?;
        Ok(rows)
    }

    /// Get a single order with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<AdminOrder>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} {ORDER_FROM} WHERE o.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else { return Ok(None) };

        let items = fetch_items(self.pool, &[row.id]).await?;
        Ok(Some(
            row.into_order(items.into_iter().map(Into::into).collect()),
        ))
    }

    /// Move an order to a new status, enforcing the state machine.
    ///
    /// Side effects, all inside one transaction:
    /// - `shipped` stamps `shipped_at` and stores the tracking number.
    /// - `delivered` stamps `delivered_at`.
    /// - `cancelled` and `refunded` restock the order's items; `refunded`
    ///   also flips the payment status.
    ///
    /// When provided, `admin_notes` is stored regardless of the target
    /// status.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::NotFound` if the order does not exist.
    /// - `RepositoryError::Conflict` if the transition is illegal.
    /// - `RepositoryError::Database` for any other failure.
    pub async fn update_status(
        &self,
        id: OrderId,
        new_status: OrderStatus,
        tracking_number: Option<&str>,
        admin_notes: Option<&str>,
    ) -> Result<AdminOrder, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<OrderStatus> =
            sqlx::query_scalar("SELECT status FROM shop.shop_order WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(tx.as_mut())
                .await?;

        let Some(current) = current else {
            return Err(RepositoryError::NotFound);
        };

        let next = current
            .transition_to(new_status)
            .map_err(|e| RepositoryError::Conflict(e.to_string()))?;

        let mut qb = QueryBuilder::new("UPDATE shop.shop_order SET status = ");
        qb.push_bind(next);

        match next {
            OrderStatus::Shipped => {
                qb.push(", shipped_at = now()");
                if let Some(tracking) = tracking_number {
                    qb.push(", tracking_number = ").push_bind(tracking.to_owned());
                }
            }
            OrderStatus::Delivered => {
                qb.push(", delivered_at = now()");
            }
            OrderStatus::Refunded => {
                qb.push(", payment_status = ").push_bind(PaymentStatus::Refunded);
            }
            _ => {}
        }

        if let Some(notes) = admin_notes {
            qb.push(", admin_notes = ").push_bind(notes.to_owned());
        }

        qb.push(" WHERE id = ").push_bind(id);
        qb.build().execute(tx.as_mut()).await?;

        // Cancelled or refunded stock goes back on the shelf
        if matches!(next, OrderStatus::Cancelled | OrderStatus::Refunded) {
            sqlx::query(
                "UPDATE shop.product p
                 SET stock = p.stock + oi.quantity
                 FROM shop.order_item oi
                 WHERE oi.order_id = $1 AND oi.product_id = p.id",
            )
            .bind(id)
            .execute(tx.as_mut())
            .await?;
        }

        tx.commit().await?;

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }
}
