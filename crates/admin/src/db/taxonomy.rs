//! Taxonomy repository: category and anime management.

use sqlx::PgPool;

use animart_core::{AnimeId, CategoryId, slugify};

use super::RepositoryError;
use crate::models::{Anime, Category};

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    slug: String,
    description: Option<String>,
    parent_id: Option<i32>,
    products_count: i64,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            slug: row.slug,
            description: row.description,
            parent_id: row.parent_id.map(CategoryId::new),
            products_count: row.products_count,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AnimeRow {
    id: i32,
    name: String,
    slug: String,
    products_count: i64,
}

impl From<AnimeRow> for Anime {
    fn from(row: AnimeRow) -> Self {
        Self {
            id: AnimeId::new(row.id),
            name: row.name,
            slug: row.slug,
            products_count: row.products_count,
        }
    }
}

const CATEGORY_COLUMNS: &str = r"
    c.id, c.name, c.slug, c.description, c.parent_id,
    (SELECT COUNT(*) FROM shop.product p WHERE p.category_id = c.id) AS products_count
";

const ANIME_COLUMNS: &str = r"
    a.id, a.name, a.slug,
    (SELECT COUNT(*) FROM shop.product p WHERE p.anime_id = a.id) AS products_count
";

/// Repository for taxonomy management.
pub struct TaxonomyRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TaxonomyRepository<'a> {
    /// Create a new taxonomy repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories, parents before children.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM shop.category c
             ORDER BY c.parent_id NULLS FIRST, c.name"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create a category. The slug is derived from the name.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::Conflict` if the derived slug already exists or
    ///   the parent id is unknown.
    /// - `RepositoryError::Database` for any other failure.
    pub async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
        parent_id: Option<i32>,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "INSERT INTO shop.category (name, slug, description, parent_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, slug, description, parent_id, 0::bigint AS products_count",
        )
        .bind(name)
        .bind(slugify(name))
        .bind(description)
        .bind(parent_id)
        .fetch_one(self.pool)
        .await
        .map_err(map_taxonomy_write_error)?;

        Ok(row.into())
    }

    /// Rename a category, re-deriving its slug.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::NotFound` if the category does not exist.
    /// - `RepositoryError::Conflict` if the new slug collides.
    pub async fn update_category(
        &self,
        id: CategoryId,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "UPDATE shop.category c SET name = $2, slug = $3, description = $4
             WHERE c.id = $1
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(slugify(name))
        .bind(description)
        .fetch_optional(self.pool)
        .await
        .map_err(map_taxonomy_write_error)?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a category.
    ///
    /// Rejected while any product still references it; recategorize first.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::NotFound` if the category does not exist.
    /// - `RepositoryError::Conflict` if products still reference it. Child
    ///   categories are promoted to top level instead.
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.category WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if e.as_database_error()
                    .is_some_and(sqlx::error::DatabaseError::is_foreign_key_violation)
                {
                    RepositoryError::Conflict("category is still in use".to_string())
                } else {
                    RepositoryError::Database(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// List all anime series.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_animes(&self) -> Result<Vec<Anime>, RepositoryError> {
        let rows = sqlx::query_as::<_, AnimeRow>(&format!(
            "SELECT {ANIME_COLUMNS} FROM shop.anime a ORDER BY a.name"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create an anime series. The slug is derived from the name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the derived slug already
    /// exists, or `RepositoryError::Database` for any other failure.
    pub async fn create_anime(&self, name: &str) -> Result<Anime, RepositoryError> {
        let row = sqlx::query_as::<_, AnimeRow>(
            "INSERT INTO shop.anime (name, slug)
             VALUES ($1, $2)
             RETURNING id, name, slug, 0::bigint AS products_count",
        )
        .bind(name)
        .bind(slugify(name))
        .fetch_one(self.pool)
        .await
        .map_err(map_taxonomy_write_error)?;

        Ok(row.into())
    }

    /// Delete an anime series.
    ///
    /// Products tagged with it fall back to no series (`anime_id` goes null
    /// by the foreign key's ON DELETE SET NULL).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the series does not exist.
    pub async fn delete_anime(&self, id: AnimeId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.anime WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

fn map_taxonomy_write_error(e: sqlx::Error) -> RepositoryError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return RepositoryError::Conflict("a row with this slug already exists".to_string());
        }
        if db.is_foreign_key_violation() {
            return RepositoryError::Conflict("unknown parent category".to_string());
        }
    }
    RepositoryError::Database(e)
}
