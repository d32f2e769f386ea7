//! Taxonomy repository: categories and anime series.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use animart_core::{AnimeId, CategoryId};

use super::RepositoryError;
use crate::models::category::{Anime, Category};

/// Internal row type for category queries.
#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    slug: String,
    description: Option<String>,
    image_url: Option<String>,
    parent_id: Option<i32>,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            slug: row.slug,
            description: row.description,
            image_url: row.image_url,
            parent_id: row.parent_id.map(CategoryId::new),
            children: Vec::new(),
            created_at: row.created_at,
        }
    }
}

/// Internal row type for anime queries.
#[derive(Debug, sqlx::FromRow)]
struct AnimeRow {
    id: i32,
    name: String,
    slug: String,
    description: Option<String>,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<AnimeRow> for Anime {
    fn from(row: AnimeRow) -> Self {
        Self {
            id: AnimeId::new(row.id),
            name: row.name,
            slug: row.slug,
            description: row.description,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

/// Repository for taxonomy reads.
pub struct TaxonomyRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TaxonomyRepository<'a> {
    /// Create a new taxonomy repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories, top-level first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, slug, description, image_url, parent_id, created_at
            FROM shop.category
            ORDER BY parent_id NULLS FIRST, name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a category by slug with its direct children attached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, slug, description, image_url, parent_id, created_at
            FROM shop.category
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut category: Category = row.into();

        let children = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, slug, description, image_url, parent_id, created_at
            FROM shop.category
            WHERE parent_id = $1
            ORDER BY name ASC
            ",
        )
        .bind(category.id)
        .fetch_all(self.pool)
        .await?;

        category.children = children.into_iter().map(Into::into).collect();
        Ok(Some(category))
    }

    /// List all anime series.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_animes(&self) -> Result<Vec<Anime>, RepositoryError> {
        let rows = sqlx::query_as::<_, AnimeRow>(
            r"
            SELECT id, name, slug, description, image_url, created_at
            FROM shop.anime
            ORDER BY name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
