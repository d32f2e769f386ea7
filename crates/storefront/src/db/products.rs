//! Product repository: catalog queries for the storefront.
//!
//! Only `published` products are ever visible here; draft and archived
//! products exist solely for the admin API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use animart_core::{Pagination, ProductId};

use super::RepositoryError;
use crate::models::product::{Product, Rating, StockStatus, TaxonomyRef};

/// Columns selected for a full product row, joined against its taxonomy.
pub(super) const PRODUCT_COLUMNS: &str = r"
    p.id, p.name, p.slug, p.description, p.price, p.original_price,
    p.discount_percent, p.stock, p.images, p.rating_average, p.rating_count,
    p.is_featured, p.is_new_arrival, p.is_bestseller, p.view_count, p.created_at,
    c.id AS category_id, c.name AS category_name, c.slug AS category_slug,
    a.id AS anime_id, a.name AS anime_name, a.slug AS anime_slug
";

pub(super) const PRODUCT_FROM: &str = r"
    FROM shop.product p
    JOIN shop.category c ON c.id = p.category_id
    LEFT JOIN shop.anime a ON a.id = p.anime_id
";

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct ProductRow {
    id: i32,
    name: String,
    slug: String,
    description: String,
    price: Decimal,
    original_price: Option<Decimal>,
    discount_percent: i32,
    stock: i32,
    images: Vec<String>,
    rating_average: Decimal,
    rating_count: i32,
    is_featured: bool,
    is_new_arrival: bool,
    is_bestseller: bool,
    view_count: i64,
    created_at: DateTime<Utc>,
    category_id: i32,
    category_name: String,
    category_slug: String,
    anime_id: Option<i32>,
    anime_name: Option<String>,
    anime_slug: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let anime = match (row.anime_id, row.anime_name, row.anime_slug) {
            (Some(id), Some(name), Some(slug)) => Some(TaxonomyRef { id, name, slug }),
            _ => None,
        };

        let mut product = Self {
            id: ProductId::new(row.id),
            name: row.name,
            slug: row.slug,
            description: row.description,
            price: row.price,
            original_price: row.original_price,
            discount_percent: row.discount_percent,
            final_price: row.price,
            stock: row.stock,
            stock_status: StockStatus::from_stock(row.stock),
            category: TaxonomyRef {
                id: row.category_id,
                name: row.category_name,
                slug: row.category_slug,
            },
            anime,
            images: row.images,
            rating: Rating {
                average: row.rating_average,
                count: row.rating_count,
            },
            is_featured: row.is_featured,
            is_new_arrival: row.is_new_arrival,
            is_bestseller: row.is_bestseller,
            view_count: row.view_count,
            created_at: row.created_at,
        };
        product.refresh_derived();
        product
    }
}

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    /// Newest first (default).
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Rating,
    /// Most viewed first.
    Popular,
}

impl ProductSort {
    /// Parse a `sortBy` query parameter; unknown values fall back to newest.
    #[must_use]
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("price_asc") => Self::PriceAsc,
            Some("price_desc") => Self::PriceDesc,
            Some("rating") => Self::Rating,
            Some("popular") => Self::Popular,
            _ => Self::Newest,
        }
    }

    const fn order_clause(self) -> &'static str {
        match self {
            Self::Newest => " ORDER BY p.created_at DESC, p.id DESC",
            Self::PriceAsc => " ORDER BY p.price ASC, p.id ASC",
            Self::PriceDesc => " ORDER BY p.price DESC, p.id DESC",
            Self::Rating => " ORDER BY p.rating_average DESC, p.rating_count DESC, p.id DESC",
            Self::Popular => " ORDER BY p.view_count DESC, p.id DESC",
        }
    }
}

/// Filters accepted by the product list endpoint.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Category slug.
    pub category: Option<String>,
    /// Anime slug.
    pub anime: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Case-insensitive substring over name, description, and anime name.
    pub search: Option<String>,
    pub sort: ProductSort,
    pub page: u32,
    pub limit: u32,
}

/// Append the WHERE fragments for a filter to a query builder.
///
/// The builder must already end in a WHERE clause, since every fragment is
/// prefixed with ` AND`.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    if let Some(category) = &filter.category {
        qb.push(" AND c.slug = ").push_bind(category.clone());
    }
    if let Some(anime) = &filter.anime {
        qb.push(" AND a.slug = ").push_bind(anime.clone());
    }
    if let Some(min) = filter.min_price {
        qb.push(" AND p.price >= ").push_bind(min);
    }
    if let Some(max) = filter.max_price {
        qb.push(" AND p.price <= ").push_bind(max);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        qb.push(" AND (p.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR a.name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// Repository for storefront product queries.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List published products matching a filter, with pagination metadata.
    ///
    /// The total always reflects the filtered set, independent of page/limit.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn list(
        &self,
        filter: &ProductFilter,
    ) -> Result<(Vec<Product>, Pagination), RepositoryError> {
        let mut count_qb = QueryBuilder::new(format!(
            "SELECT COUNT(*) {PRODUCT_FROM} WHERE p.status = 'published'"
        ));
        push_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool)
            .await?;

        let pagination = Pagination::new(
            u64::try_from(total).unwrap_or_default(),
            filter.page,
            filter.limit,
        );

        let mut qb = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} {PRODUCT_FROM} WHERE p.status = 'published'"
        ));
        push_filters(&mut qb, filter);
        qb.push(filter.sort.order_clause());
        qb.push(" LIMIT ")
            .push_bind(i64::from(pagination.limit))
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let rows: Vec<ProductRow> = qb.build_query_as().fetch_all(self.pool).await?;

        Ok((rows.into_iter().map(Into::into).collect(), pagination))
    }

    /// Get a published product by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} {PRODUCT_FROM} WHERE p.status = 'published' AND p.slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Bump the view counter for a product.
    ///
    /// Callers treat this as fire-and-forget: a failure here must never fail
    /// the request that displayed the product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn increment_view_count(&self, id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE shop.product SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
