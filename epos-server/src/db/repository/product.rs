//! Product Repository
//!
//! `price` 以 TEXT 存储，经 [`ProductRow`] 转换为 `Decimal`。

use std::collections::HashMap;

use super::{RepoError, RepoResult, parse_money};
use shared::models::{Product, ProductSave};
use shared::util::snowflake_id;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const SELECT: &str = "SELECT p.id, p.name, p.price, p.category_id, c.name AS category_name, \
     p.image_url, p.is_active, p.sort_order FROM product p LEFT JOIN category c ON c.id = p.category_id";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price: String,
    category_id: Option<i64>,
    category_name: Option<String>,
    image_url: Option<String>,
    is_active: bool,
    sort_order: i32,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepoError;

    fn try_from(row: ProductRow) -> RepoResult<Self> {
        Ok(Product {
            price: parse_money("product.price", &row.price)?,
            id: row.id,
            name: row.name,
            category_id: row.category_id,
            category_name: row.category_name,
            image_url: row.image_url,
            is_active: row.is_active,
            sort_order: row.sort_order,
        })
    }
}

fn into_products(rows: Vec<ProductRow>) -> RepoResult<Vec<Product>> {
    rows.into_iter().map(Product::try_from).collect()
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let sql = format!("{SELECT} ORDER BY p.sort_order, p.name");
    let rows = sqlx::query_as::<_, ProductRow>(&sql).fetch_all(pool).await?;
    into_products(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{SELECT} WHERE p.id = ?");
    let row = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(Product::try_from).transpose()
}

pub async fn find_by_category(pool: &SqlitePool, category_id: i64) -> RepoResult<Vec<Product>> {
    let sql = format!("{SELECT} WHERE p.category_id = ? ORDER BY p.sort_order, p.name");
    let rows = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(category_id)
        .fetch_all(pool)
        .await?;
    into_products(rows)
}

/// Batch lookup used by pricing and read-side enrichment
pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<Product>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT);
    qb.push(" WHERE p.id IN (");
    {
        let mut sep = qb.separated(", ");
        for id in ids {
            sep.push_bind(*id);
        }
    }
    qb.push(")");
    let rows = qb.build_query_as::<ProductRow>().fetch_all(pool).await?;
    into_products(rows)
}

/// [`find_by_ids`] keyed by product id
pub async fn find_map(pool: &SqlitePool, ids: &[i64]) -> RepoResult<HashMap<i64, Product>> {
    let products = find_by_ids(pool, ids).await?;
    Ok(products.into_iter().map(|p| (p.id, p)).collect())
}

/// Upsert: update when `id` names an existing row, insert otherwise
pub async fn save(pool: &SqlitePool, data: ProductSave) -> RepoResult<Product> {
    let price = crate::money::to_storage(data.price);

    if let Some(id) = data.id {
        let rows = sqlx::query(
            "UPDATE product SET name = ?1, price = ?2, category_id = ?3, image_url = ?4, \
             is_active = COALESCE(?5, is_active), sort_order = COALESCE(?6, sort_order) WHERE id = ?7",
        )
        .bind(&data.name)
        .bind(&price)
        .bind(data.category_id)
        .bind(&data.image_url)
        .bind(data.is_active)
        .bind(data.sort_order)
        .bind(id)
        .execute(pool)
        .await?;
        if rows.rows_affected() > 0 {
            return fetch_saved(pool, id).await;
        }
    }

    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO product (id, name, price, category_id, image_url, is_active, sort_order) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&price)
    .bind(data.category_id)
    .bind(&data.image_url)
    .bind(data.is_active.unwrap_or(true))
    .bind(data.sort_order.unwrap_or(0))
    .execute(pool)
    .await?;
    fetch_saved(pool, id).await
}

async fn fetch_saved(pool: &SqlitePool, id: i64) -> RepoResult<Product> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to save product".into()))
}

/// 删除商品；订单/交易明细保留快照，不级联
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
