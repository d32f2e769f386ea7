//! Cart repository.
//!
//! Carts are keyed by an opaque token held in the visitor's session, so
//! guests can shop before signing in. On sign-in the session's cart is
//! attached to the user id.

use rust_decimal::Decimal;
use sqlx::PgPool;

use animart_core::{CartId, ProductId, UserId, final_price};

use super::RepositoryError;
use crate::models::cart::{Cart, CartLine};
use crate::models::product::StockStatus;

#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    product_id: i32,
    name: String,
    slug: String,
    images: Vec<String>,
    price: Decimal,
    discount_percent: i32,
    stock: i32,
    quantity: i32,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        let unit_price = final_price(row.price, row.discount_percent);
        Self {
            product_id: ProductId::new(row.product_id),
            name: row.name,
            slug: row.slug,
            image: row.images.into_iter().next(),
            unit_price,
            quantity: row.quantity,
            line_total: unit_price * Decimal::from(row.quantity),
            stock_status: StockStatus::from_stock(row.stock),
        }
    }
}

/// Repository for cart operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find the cart for a session token, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn find_or_create(&self, token: &str) -> Result<CartId, RepositoryError> {
        // DO UPDATE (rather than DO NOTHING) so RETURNING always yields a row
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO shop.cart (token) VALUES ($1)
             ON CONFLICT (token) DO UPDATE SET updated_at = now()
             RETURNING id",
        )
        .bind(token)
        .fetch_one(self.pool)
        .await?;

        Ok(CartId::new(id))
    }

    /// Load a cart with its lines joined against live product rows.
    ///
    /// Lines whose product has been unpublished or deleted disappear from
    /// the cart rather than blocking it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn load(&self, cart_id: CartId) -> Result<Cart, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            "SELECT ci.product_id, p.name, p.slug, p.images, p.price,
                    p.discount_percent, p.stock, ci.quantity
             FROM shop.cart_item ci
             JOIN shop.product p ON p.id = ci.product_id
             WHERE ci.cart_id = $1 AND p.status = 'published'
             ORDER BY ci.added_at",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(Cart::from_lines(
            cart_id,
            rows.into_iter().map(Into::into).collect(),
        ))
    }

    /// Add a quantity of a product to a cart, merging with an existing line.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::NotFound` if the product does not exist or is not
    ///   published.
    /// - `RepositoryError::InsufficientStock` if the resulting line quantity
    ///   would exceed available stock.
    /// - `RepositoryError::Database` for any other failure.
    pub async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let stock: Option<i32> = sqlx::query_scalar(
            "SELECT stock FROM shop.product WHERE id = $1 AND status = 'published'",
        )
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(stock) = stock else {
            return Err(RepositoryError::NotFound);
        };

        let existing: Option<i32> = sqlx::query_scalar(
            "SELECT quantity FROM shop.cart_item WHERE cart_id = $1 AND product_id = $2",
        )
        .bind(cart_id)
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        let requested = existing.unwrap_or(0).saturating_add(quantity);
        if requested > stock {
            return Err(RepositoryError::InsufficientStock(format!(
                "only {stock} in stock"
            )));
        }

        sqlx::query(
            "INSERT INTO shop.cart_item (cart_id, product_id, quantity)
             VALUES ($1, $2, $3)
             ON CONFLICT (cart_id, product_id)
             DO UPDATE SET quantity = shop.cart_item.quantity + EXCLUDED.quantity",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Set the quantity of a cart line. A quantity of zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line does not exist, or
    /// `RepositoryError::Database` if the update fails.
    pub async fn set_item_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        if quantity <= 0 {
            return self.remove_item(cart_id, product_id).await;
        }

        let result = sqlx::query(
            "UPDATE shop.cart_item SET quantity = $3
             WHERE cart_id = $1 AND product_id = $2",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Remove a line from a cart. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM shop.cart_item WHERE cart_id = $1 AND product_id = $2")
            .bind(cart_id)
            .bind(product_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Remove every line from a cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear(&self, cart_id: CartId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM shop.cart_item WHERE cart_id = $1")
            .bind(cart_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Attach a guest cart to a user after sign-in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn attach_user(
        &self,
        cart_id: CartId,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE shop.cart SET user_id = $2, updated_at = now() WHERE id = $1")
            .bind(cart_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
