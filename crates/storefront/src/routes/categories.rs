//! Category and anime taxonomy route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::db::TaxonomyRepository;
use crate::error::AppError;
use crate::state::AppState;

/// List all categories, parents before children.
///
/// # Errors
///
/// Returns `AppError::Database` if the query fails.
pub async fn index(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let categories = TaxonomyRepository::new(state.pool())
        .list_categories()
        .await?;
    Ok(Json(json!({ "categories": categories })))
}

/// Get a category by slug, with its direct children.
///
/// # Errors
///
/// Returns `AppError::NotFound` if no category has this slug, or
/// `AppError::Database` if the query fails.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, AppError> {
    let category = TaxonomyRepository::new(state.pool())
        .get_category_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category '{slug}' not found")))?;
    Ok(Json(json!({ "category": category })))
}

/// List all anime series.
///
/// # Errors
///
/// Returns `AppError::Database` if the query fails.
pub async fn animes(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let animes = TaxonomyRepository::new(state.pool()).list_animes().await?;
    Ok(Json(json!({ "animes": animes })))
}
