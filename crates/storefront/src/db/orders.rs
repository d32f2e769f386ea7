//! Order repository: checkout, history, and customer-initiated cancellation.
//!
//! Checkout runs as a single transaction. Stock is taken with a guarded
//! decrement (`stock = stock - n WHERE stock >= n`), so two concurrent
//! checkouts can never oversell: the second one sees zero rows affected and
//! the whole transaction rolls back.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use animart_core::{
    CartId, OrderId, OrderStatus, Pagination, PaymentStatus, ProductId, UserId, final_price,
};

use super::RepositoryError;
use crate::models::order::{Order, OrderItem, ShippingAddress};

const ORDER_COLUMNS: &str = r"
    id, order_number, user_id, status, payment_status, total,
    shipping_address, tracking_number, created_at, shipped_at, delivered_at
";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    order_number: String,
    user_id: Option<i32>,
    status: OrderStatus,
    payment_status: PaymentStatus,
    total: Decimal,
    shipping_address: Json<ShippingAddress>,
    tracking_number: Option<String>,
    created_at: DateTime<Utc>,
    shipped_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: OrderId::new(self.id),
            order_number: self.order_number,
            user_id: self.user_id.map(UserId::new),
            status: self.status,
            payment_status: self.payment_status,
            items,
            total: self.total,
            shipping_address: self.shipping_address.0,
            tracking_number: self.tracking_number,
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

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            product_id: row.product_id.map(ProductId::new),
            name: row.name,
            unit_price: row.unit_price,
            quantity: row.quantity,
        }
    }
}

/// Cart line as captured at checkout time, inside the transaction.
#[derive(Debug, sqlx::FromRow)]
struct CheckoutLineRow {
    product_id: i32,
    name: String,
    price: Decimal,
    discount_percent: i32,
    quantity: i32,
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

/// Repository for customer-facing order operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order from the contents of a cart.
    ///
    /// Runs as one transaction: snapshot the cart lines, take stock with
    /// guarded decrements, insert the order and its items, clear the cart,
    /// and bump the customer's lifetime spend and loyalty points. Guest
    /// orders pass no user id and skip the loyalty bookkeeping. Any failure
    /// rolls the whole thing back, stock included.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::Conflict` if the cart is empty.
    /// - `RepositoryError::InsufficientStock` if any line exceeds available
    ///   stock; the error names the product.
    /// - `RepositoryError::Database` for any other failure.
    pub async fn create_from_cart(
        &self,
        user_id: Option<UserId>,
        cart_id: CartId,
        shipping_address: &ShippingAddress,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let lines = sqlx::query_as::<_, CheckoutLineRow>(
            "SELECT ci.product_id, p.name, p.price, p.discount_percent, ci.quantity
             FROM shop.cart_item ci
             JOIN shop.product p ON p.id = ci.product_id
             WHERE ci.cart_id = $1 AND p.status = 'published'
             ORDER BY ci.added_at",
        )
        .bind(cart_id)
        .fetch_all(tx.as_mut())
        .await?;

        if lines.is_empty() {
            return Err(RepositoryError::Conflict("cart is empty".to_string()));
        }

        let mut total = Decimal::ZERO;
        for line in &lines {
            take_stock(tx.as_mut(), line).await?;
            total += final_price(line.price, line.discount_percent) * Decimal::from(line.quantity);
        }

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO shop.shop_order (order_number, user_id, total, shipping_address)
             VALUES (
                 'AM-' || to_char(now(), 'YYYYMMDD') || '-'
                       || lpad(nextval('shop.order_number_seq')::text, 4, '0'),
                 $1, $2, $3
             )
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(total)
        .bind(Json(shipping_address))
        .fetch_one(tx.as_mut())
        .await?;

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let unit_price = final_price(line.price, line.discount_percent);
            sqlx::query(
                "INSERT INTO shop.order_item (order_id, product_id, name, unit_price, quantity)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(row.id)
            .bind(line.product_id)
            .bind(&line.name)
            .bind(unit_price)
            .bind(line.quantity)
            .execute(tx.as_mut())
            .await?;

            items.push(OrderItem {
                product_id: Some(ProductId::new(line.product_id)),
                name: line.name,
                unit_price,
                quantity: line.quantity,
            });
        }

        sqlx::query("DELETE FROM shop.cart_item WHERE cart_id = $1")
            .bind(cart_id)
            .execute(tx.as_mut())
            .await?;

        // 1 loyalty point per whole currency unit spent
        if let Some(user_id) = user_id {
            sqlx::query(
                "UPDATE shop.shop_user
                 SET total_spent = total_spent + $2,
                     loyalty_points = loyalty_points + $3
                 WHERE id = $1",
            )
            .bind(user_id)
            .bind(total)
            .bind(loyalty_points(total))
            .execute(tx.as_mut())
            .await?;
        }

        tx.commit().await?;

        Ok(row.into_order(items))
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<Order>, Pagination), RepositoryError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM shop.shop_order WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;

        let pagination = Pagination::new(u64::try_from(total).unwrap_or_default(), page, limit);

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.shop_order
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(i64::from(pagination.limit))
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut items: std::collections::HashMap<i32, Vec<OrderItem>> = std::collections::HashMap::new();
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

    /// Get a single order, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn get_for_user(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.shop_order WHERE id = $1 AND user_id = $2"
        ))
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else { return Ok(None) };

        let items = fetch_items(self.pool, &[row.id]).await?;
        Ok(Some(
            row.into_order(items.into_iter().map(Into::into).collect()),
        ))
    }

    /// Cancel an order that has not yet shipped, restocking its items.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::NotFound` if the order does not exist or belongs
    ///   to someone else.
    /// - `RepositoryError::Conflict` if the order is past the point of
    ///   cancellation.
    /// - `RepositoryError::Database` for any other failure.
    pub async fn cancel(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let status: Option<OrderStatus> = sqlx::query_scalar(
            "SELECT status FROM shop.shop_order
             WHERE id = $1 AND user_id = $2
             FOR UPDATE",
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(tx.as_mut())
        .await?;

        let Some(status) = status else {
            return Err(RepositoryError::NotFound);
        };

        let next = status
            .transition_to(OrderStatus::Cancelled)
            .map_err(|e| RepositoryError::Conflict(e.to_string()))?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE shop.shop_order SET status = $2 WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order_id)
        .bind(next)
        .fetch_one(tx.as_mut())
        .await?;

        // Return stock for lines whose product still exists
        sqlx::query(
            "UPDATE shop.product p
             SET stock = p.stock + oi.quantity
             FROM shop.order_item oi
             WHERE oi.order_id = $1 AND oi.product_id = p.id",
        )
        .bind(order_id)
        .execute(tx.as_mut())
        .await?;

        let items = sqlx::query_as::<_, OrderItemRow>(
            "SELECT order_id, product_id, name, unit_price, quantity
             FROM shop.order_item WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(tx.as_mut())
        .await?;

        tx.commit().await?;

        Ok(row.into_order(items.into_iter().map(Into::into).collect()))
    }
}

/// Whole currency units spent, for the 1-point-per-unit loyalty scheme.
fn loyalty_points(total: Decimal) -> i32 {
    use rust_decimal::prelude::ToPrimitive;

    total
        .trunc()
        .to_i64()
        .and_then(|v| i32::try_from(v).ok())
        .unwrap_or(0)
}

async fn take_stock(conn: &mut PgConnection, line: &CheckoutLineRow) -> Result<(), RepositoryError> {
    let result = sqlx::query("UPDATE shop.product SET stock = stock - $1 WHERE id = $2 AND stock >= $1")
        .bind(line.quantity)
        .bind(line.product_id)
        .execute(conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::InsufficientStock(format!(
            "insufficient stock for {}",
            line.name
        )));
    }
    Ok(())
}
