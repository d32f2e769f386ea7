//! Taxonomy models: categories and anime series.
//!
//! Both exist purely as filter dimensions for products. Categories support
//! one level of nesting (parent -> children).

use chrono::{DateTime, Utc};
use serde::Serialize;

use animart_core::{AnimeId, CategoryId};

/// A product category (e.g. "Figures", "Apparel").
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub parent_id: Option<CategoryId>,
    /// Direct children; populated only on the category detail endpoint.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Category>,
    pub created_at: DateTime<Utc>,
}

/// An anime series products are tagged with (e.g. "One Piece").
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Anime {
    pub id: AnimeId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
