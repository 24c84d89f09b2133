//! Category Repository

use super::RepoResult;
use shared::models::{Category, CategorySave};
use shared::util::snowflake_id;
use sqlx::SqlitePool;

const COLUMNS: &str =
    "id, name, description, is_active, sort_order, icon, parent_category_id, button_text";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let sql = format!("SELECT {COLUMNS} FROM category ORDER BY sort_order, name");
    let categories = sqlx::query_as::<_, Category>(&sql).fetch_all(pool).await?;
    Ok(categories)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let sql = format!("SELECT {COLUMNS} FROM category WHERE id = ?");
    let category = sqlx::query_as::<_, Category>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(category)
}

/// Upsert: update when `id` names an existing row, insert otherwise
pub async fn save(pool: &SqlitePool, data: CategorySave) -> RepoResult<Category> {
    if let Some(id) = data.id {
        let rows = sqlx::query(
            "UPDATE category SET name = ?1, description = ?2, is_active = COALESCE(?3, is_active), \
             sort_order = COALESCE(?4, sort_order), icon = COALESCE(?5, icon), \
             parent_category_id = ?6, button_text = ?7 WHERE id = ?8",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.is_active)
        .bind(data.sort_order)
        .bind(&data.icon)
        .bind(data.parent_category_id)
        .bind(&data.button_text)
        .bind(id)
        .execute(pool)
        .await?;
        if rows.rows_affected() > 0 {
            return fetch_saved(pool, id).await;
        }
    }

    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO category (id, name, description, is_active, sort_order, icon, parent_category_id, button_text) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.is_active.unwrap_or(true))
    .bind(data.sort_order.unwrap_or(0))
    .bind(data.icon.unwrap_or_default())
    .bind(data.parent_category_id)
    .bind(&data.button_text)
    .execute(pool)
    .await?;
    fetch_saved(pool, id).await
}

async fn fetch_saved(pool: &SqlitePool, id: i64) -> RepoResult<Category> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| super::RepoError::Database("Failed to save category".into()))
}

/// 删除分类；商品的 category_id 由外键置空
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM category WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
