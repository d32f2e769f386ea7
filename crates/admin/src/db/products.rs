//! Product repository: full catalog management.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use animart_core::{AnimeId, CategoryId, Pagination, ProductId, ProductStatus, slugify};

use super::RepositoryError;
use crate::models::AdminProduct;

const PRODUCT_COLUMNS: &str = r"
    p.id, p.name, p.slug, p.description, p.price, p.original_price,
    p.discount_percent, p.stock, p.status, p.images, p.rating_average,
    p.rating_count, p.is_featured, p.is_new_arrival, p.is_bestseller,
    p.view_count, p.created_at, p.updated_at,
    p.category_id, c.name AS category_name,
    p.anime_id, a.name AS anime_name
";

const PRODUCT_FROM: &str = r"
    FROM shop.product p
    JOIN shop.category c ON c.id = p.category_id
    LEFT JOIN shop.anime a ON a.id = p.anime_id
";

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    slug: String,
    description: String,
    price: Decimal,
    original_price: Option<Decimal>,
    discount_percent: i32,
    stock: i32,
    status: ProductStatus,
    images: Vec<String>,
    rating_average: Decimal,
    rating_count: i32,
    is_featured: bool,
    is_new_arrival: bool,
    is_bestseller: bool,
    view_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    category_id: i32,
    category_name: String,
    anime_id: Option<i32>,
    anime_name: Option<String>,
}

impl From<ProductRow> for AdminProduct {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            slug: row.slug,
            description: row.description,
            price: row.price,
            original_price: row.original_price,
            discount_percent: row.discount_percent,
            stock: row.stock,
            status: row.status,
            category_id: CategoryId::new(row.category_id),
            category_name: row.category_name,
            anime_id: row.anime_id.map(AnimeId::new),
            anime_name: row.anime_name,
            images: row.images,
            is_featured: row.is_featured,
            is_new_arrival: row.is_new_arrival,
            is_bestseller: row.is_bestseller,
            view_count: row.view_count,
            rating_average: row.rating_average,
            rating_count: row.rating_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Filters accepted by the admin product listing.
#[derive(Debug, Clone, Default)]
pub struct AdminProductFilter {
    pub status: Option<ProductStatus>,
    pub category_id: Option<i32>,
    /// Case-insensitive substring over name and description.
    pub search: Option<String>,
    pub stock_min: Option<i32>,
    pub stock_max: Option<i32>,
    pub page: u32,
    pub limit: u32,
}

/// Fields for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub discount_percent: i32,
    pub stock: i32,
    pub status: ProductStatus,
    pub category_id: i32,
    pub anime_id: Option<i32>,
    pub images: Vec<String>,
}

/// Partial update for a product; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub original_price: Option<Option<Decimal>>,
    pub discount_percent: Option<i32>,
    pub status: Option<ProductStatus>,
    pub category_id: Option<i32>,
    pub anime_id: Option<Option<i32>>,
    pub images: Option<Vec<String>>,
    pub is_featured: Option<bool>,
    pub is_new_arrival: Option<bool>,
    pub is_bestseller: Option<bool>,
}

impl ProductPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.original_price.is_none()
            && self.discount_percent.is_none()
            && self.status.is_none()
            && self.category_id.is_none()
            && self.anime_id.is_none()
            && self.images.is_none()
            && self.is_featured.is_none()
            && self.is_new_arrival.is_none()
            && self.is_bestseller.is_none()
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &AdminProductFilter) {
    if let Some(status) = filter.status {
        qb.push(" AND p.status = ").push_bind(status);
    }
    if let Some(category_id) = filter.category_id {
        qb.push(" AND p.category_id = ").push_bind(category_id);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        qb.push(" AND (p.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(min) = filter.stock_min {
        qb.push(" AND p.stock >= ").push_bind(min);
    }
    if let Some(max) = filter.stock_max {
        qb.push(" AND p.stock <= ").push_bind(max);
    }
}

/// Repository for admin product management.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products of any status, with pagination metadata.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn list(
        &self,
        filter: &AdminProductFilter,
    ) -> Result<(Vec<AdminProduct>, Pagination), RepositoryError> {
        let mut count_qb = QueryBuilder::new(format!("SELECT COUNT(*) {PRODUCT_FROM} WHERE TRUE"));
        push_filters(&mut count_qb, filter);
        let total: i64 = count_qb.build_query_scalar().fetch_one(self.pool).await?;

        let pagination = Pagination::new(
            u64::try_from(total).unwrap_or_default(),
            filter.page,
            filter.limit,
        );

        let mut qb = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} {PRODUCT_FROM} WHERE TRUE"
        ));
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY p.created_at DESC, p.id DESC");
        qb.push(" LIMIT ")
            .push_bind(i64::from(pagination.limit))
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let rows: Vec<ProductRow> = qb.build_query_as().fetch_all(self.pool).await?;

        Ok((rows.into_iter().map(Into::into).collect(), pagination))
    }

    /// Get a product by id, regardless of status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<AdminProduct>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} {PRODUCT_FROM} WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a product. The slug is derived from the name.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::Conflict` if the derived slug already exists or
    ///   the category or anime id is unknown.
    /// - `RepositoryError::Database` for any other failure.
    pub async fn create(&self, new: &NewProduct) -> Result<AdminProduct, RepositoryError> {
        let slug = slugify(&new.name);

        let id: i32 = sqlx::query_scalar(
            "INSERT INTO shop.product
                 (name, slug, description, price, original_price, discount_percent,
                  stock, status, category_id, anime_id, images)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING id",
        )
        .bind(&new.name)
        .bind(&slug)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.original_price)
        .bind(new.discount_percent)
        .bind(new.stock)
        .bind(new.status)
        .bind(new.category_id)
        .bind(new.anime_id)
        .bind(&new.images)
        .fetch_one(self.pool)
        .await
        .map_err(map_product_write_error)?;

        self.get(ProductId::new(id))
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Apply a partial update to a product.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::NotFound` if the product does not exist.
    /// - `RepositoryError::Conflict` for slug or foreign key violations.
    /// - `RepositoryError::Database` for any other failure.
    pub async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<AdminProduct, RepositoryError> {
        if patch.is_empty() {
            return self.get(id).await?.ok_or(RepositoryError::NotFound);
        }

        let mut qb = QueryBuilder::new("UPDATE shop.product SET updated_at = now()");

        if let Some(name) = &patch.name {
            qb.push(", name = ").push_bind(name.clone());
            qb.push(", slug = ").push_bind(slugify(name));
        }
        if let Some(description) = &patch.description {
            qb.push(", description = ").push_bind(description.clone());
        }
        if let Some(price) = patch.price {
            qb.push(", price = ").push_bind(price);
        }
        if let Some(original_price) = &patch.original_price {
            qb.push(", original_price = ").push_bind(*original_price);
        }
        if let Some(discount_percent) = patch.discount_percent {
            qb.push(", discount_percent = ").push_bind(discount_percent);
        }
        if let Some(status) = patch.status {
            qb.push(", status = ").push_bind(status);
        }
        if let Some(category_id) = patch.category_id {
            qb.push(", category_id = ").push_bind(category_id);
        }
        if let Some(anime_id) = &patch.anime_id {
            qb.push(", anime_id = ").push_bind(*anime_id);
        }
        if let Some(images) = &patch.images {
            qb.push(", images = ").push_bind(images.clone());
        }
        if let Some(is_featured) = patch.is_featured {
            qb.push(", is_featured = ").push_bind(is_featured);
        }
        if let Some(is_new_arrival) = patch.is_new_arrival {
            qb.push(", is_new_arrival = ").push_bind(is_new_arrival);
        }
        if let Some(is_bestseller) = patch.is_bestseller {
            qb.push(", is_bestseller = ").push_bind(is_bestseller);
        }

        qb.push(" WHERE id = ").push_bind(id);

        let result = qb
            .build()
            .execute(self.pool)
            .await
            .map_err(map_product_write_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// Order items keep their snapshot and fall back to a null product
    /// reference; cart and wishlist entries are dropped by cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist, or
    /// `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Adjust stock by a signed delta, guarded against going negative.
    ///
    /// The guard lives in the WHERE clause, so two concurrent decrements can
    /// never drive stock below zero; the loser simply matches no row.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::NotFound` if the product does not exist.
    /// - `RepositoryError::InsufficientStock` if the delta would take stock
    ///   below zero.
    /// - `RepositoryError::Database` for any other failure.
    pub async fn adjust_stock(
        &self,
        id: ProductId,
        delta: i32,
    ) -> Result<i32, RepositoryError> {
        let stock: Option<i32> = sqlx::query_scalar(
            "UPDATE shop.product
             SET stock = stock + $1, updated_at = now()
             WHERE id = $2 AND stock + $1 >= 0
             RETURNING stock",
        )
        .bind(delta)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        if let Some(stock) = stock {
            return Ok(stock);
        }

        // Distinguish a missing product from an oversized decrement
        let current: Option<i32> = sqlx::query_scalar("SELECT stock FROM shop.product WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        match current {
            None => Err(RepositoryError::NotFound),
            Some(current) => Err(RepositoryError::InsufficientStock(format!(
                "cannot adjust stock by {delta}: only {current} available"
            ))),
        }
    }
}

fn map_product_write_error(e: sqlx::Error) -> RepositoryError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return RepositoryError::Conflict("a product with this slug already exists".to_string());
        }
        if db.is_foreign_key_violation() {
            return RepositoryError::Conflict("unknown category or anime id".to_string());
        }
    }
    RepositoryError::Database(e)
}
