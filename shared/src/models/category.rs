//! Category Model

use serde::{Deserialize, Serialize};

use super::Product;

/// Category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    #[serde(default)]
    pub icon: String,
    pub parent_category_id: Option<i64>,
    pub button_text: Option<String>,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Save (upsert) category payload
///
/// A missing or unknown `id` creates a new category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySave {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
    pub icon: Option<String>,
    pub parent_category_id: Option<i64>,
    pub button_text: Option<String>,
}
