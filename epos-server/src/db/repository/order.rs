//! Order Repository
//!
//! 订单与明细。金额列经行结构转换为 `Decimal`；
//! 事务内操作接收 `&mut SqliteConnection`，由订单管理器控制提交。

use std::collections::HashMap;

use super::{RepoError, RepoResult, parse_money};
use crate::money::to_storage;
use shared::models::{Order, OrderItem, OrderStatus};
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};

const ORDER_COLUMNS: &str = "id, created_at, table_number, total_amount, status, notes, created_by";
const ITEM_COLUMNS: &str =
    "id, order_id, product_id, product_name, quantity, unit_price, total_price";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    created_at: i64,
    table_number: i32,
    total_amount: String,
    status: OrderStatus,
    notes: Option<String>,
    created_by: Option<i64>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> RepoResult<Order> {
        Ok(Order {
            total_amount: parse_money("orders.total_amount", &self.total_amount)?,
            id: self.id,
            created_at: self.created_at,
            table_number: self.table_number,
            status: self.status,
            notes: self.notes,
            created_by: self.created_by,
            items,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    product_id: i64,
    product_name: Option<String>,
    quantity: i32,
    unit_price: String,
    total_price: String,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepoError;

    fn try_from(row: OrderItemRow) -> RepoResult<Self> {
        Ok(OrderItem {
            unit_price: parse_money("order_item.unit_price", &row.unit_price)?,
            total_price: parse_money("order_item.total_price", &row.total_price)?,
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            product: None,
        })
    }
}

/// All orders, newest first, with items
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, OrderRow>(&sql).fetch_all(pool).await?;

    let sql = format!("SELECT {ITEM_COLUMNS} FROM order_item ORDER BY order_id, id");
    let item_rows = sqlx::query_as::<_, OrderItemRow>(&sql)
        .fetch_all(pool)
        .await?;

    let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for row in item_rows {
        let item = OrderItem::try_from(row)?;
        by_order.entry(item.order_id).or_default().push(item);
    }

    rows.into_iter()
        .map(|row| {
            let items = by_order.remove(&row.id).unwrap_or_default();
            row.into_order(items)
        })
        .collect()
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?");
    let Some(row) = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };
    let items = find_items(pool, id).await?;
    row.into_order(items).map(Some)
}

/// Items of one order, in insertion order
pub async fn find_items<'e, E>(executor: E, order_id: i64) -> RepoResult<Vec<OrderItem>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {ITEM_COLUMNS} FROM order_item WHERE order_id = ? ORDER BY id");
    let rows = sqlx::query_as::<_, OrderItemRow>(&sql)
        .bind(order_id)
        .fetch_all(executor)
        .await?;
    rows.into_iter().map(OrderItem::try_from).collect()
}

/// Current status, `None` when the order does not exist
pub async fn find_status<'e, E>(executor: E, id: i64) -> RepoResult<Option<OrderStatus>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let status = sqlx::query_scalar::<_, OrderStatus>("SELECT status FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(status)
}

/// Insert order and items (caller owns the transaction)
pub async fn insert(conn: &mut SqliteConnection, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, created_at, table_number, total_amount, status, notes, created_by) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(order.id)
    .bind(order.created_at)
    .bind(order.table_number)
    .bind(to_storage(order.total_amount))
    .bind(order.status)
    .bind(&order.notes)
    .bind(order.created_by)
    .execute(&mut *conn)
    .await?;

    for item in &order.items {
        sqlx::query(
            "INSERT INTO order_item (id, order_id, product_id, product_name, quantity, unit_price, total_price) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(item.id)
        .bind(order.id)
        .bind(item.product_id)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(to_storage(item.unit_price))
        .bind(to_storage(item.total_price))
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Conditional status update: only applies when the order is currently `from`
///
/// Returns `false` when no row matched (absent or in another state).
pub async fn update_status_if(
    conn: &mut SqliteConnection,
    id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE orders SET status = ? WHERE id = ? AND status = ?")
        .bind(to)
        .bind(id)
        .bind(from)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// 删除订单及其明细 (同一事务)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM order_item WHERE order_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        // 无此订单: 回滚 (tx drop)
        return Ok(false);
    }
    tx.commit().await?;
    Ok(true)
}
