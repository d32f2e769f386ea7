//! Category and anime series route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use animart_core::{AnimeId, CategoryId};

use crate::db::TaxonomyRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Request body for creating or renaming a category.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i32>,
}

/// Request body for creating an anime series.
#[derive(Debug, Deserialize)]
pub struct AnimeRequest {
    pub name: String,
}

/// List categories with live product counts.
///
/// # Errors
///
/// Returns `AppError::Database` if the query fails.
pub async fn categories(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Value>, AppError> {
    let categories = TaxonomyRepository::new(state.pool()).list_categories().await?;
    Ok(Json(json!({ "categories": categories })))
}

/// Create a category.
///
/// # Errors
///
/// - `AppError::Validation` for a blank name.
/// - `AppError::Conflict` for a slug collision or unknown parent id.
pub async fn create_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let name = validated_name(&body.name)?;

    let category = TaxonomyRepository::new(state.pool())
        .create_category(name, body.description.as_deref(), body.parent_id)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "category": category }))))
}

/// Rename a category; its slug is re-derived from the new name.
///
/// # Errors
///
/// - `AppError::Validation` for a blank name.
/// - `AppError::NotFound` if the category does not exist.
/// - `AppError::Conflict` if the new slug collides.
pub async fn update_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(body): Json<CategoryRequest>,
) -> Result<Json<Value>, AppError> {
    let name = validated_name(&body.name)?;

    let category = TaxonomyRepository::new(state.pool())
        .update_category(CategoryId::new(id), name, body.description.as_deref())
        .await?;

    Ok(Json(json!({ "category": category })))
}

/// Delete a category.
///
/// # Errors
///
/// - `AppError::NotFound` if the category does not exist.
/// - `AppError::Conflict` if any product still references it.
pub async fn delete_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    TaxonomyRepository::new(state.pool())
        .delete_category(CategoryId::new(id))
        .await?;

    Ok(Json(json!({ "message": "category deleted" })))
}

/// List anime series with live product counts.
///
/// # Errors
///
/// Returns `AppError::Database` if the query fails.
pub async fn animes(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Value>, AppError> {
    let animes = TaxonomyRepository::new(state.pool()).list_animes().await?;
    Ok(Json(json!({ "animes": animes })))
}

/// Create an anime series.
///
/// # Errors
///
/// - `AppError::Validation` for a blank name.
/// - `AppError::Conflict` for a slug collision.
pub async fn create_anime(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<AnimeRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let name = validated_name(&body.name)?;

    let anime = TaxonomyRepository::new(state.pool()).create_anime(name).await?;

    Ok((StatusCode::CREATED, Json(json!({ "anime": anime }))))
}

/// Delete an anime series. Tagged products keep existing with the tag
/// cleared.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the series does not exist.
pub async fn delete_anime(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    TaxonomyRepository::new(state.pool())
        .delete_anime(AnimeId::new(id))
        .await?;

    Ok(Json(json!({ "message": "anime deleted" })))
}

fn validated_name(name: &str) -> Result<&str, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_owned()));
    }
    Ok(trimmed)
}
