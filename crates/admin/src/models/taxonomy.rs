//! Admin view of categories and anime series.

use serde::Serialize;

use animart_core::{AnimeId, CategoryId};

/// A product category, with its live product count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
    pub products_count: i64,
}

/// An anime series products can be tagged with.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Anime {
    pub id: AnimeId,
    pub name: String,
    pub slug: String,
    pub products_count: i64,
}
