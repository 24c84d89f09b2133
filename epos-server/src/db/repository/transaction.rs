//! Transaction Repository
//!
//! 交易账本与明细，无更新操作。

use std::collections::HashMap;

use super::{RepoError, RepoResult, parse_money};
use crate::money::to_storage;
use shared::models::{Transaction, TransactionItem, TransactionStatus};
use sqlx::{SqliteConnection, SqlitePool};

const TX_COLUMNS: &str = "id, user_id, order_id, created_at, total_amount, status";
const ITEM_COLUMNS: &str =
    "id, transaction_id, product_id, product_name, quantity, unit_price, total_price";

#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: i64,
    user_id: Option<i64>,
    order_id: Option<i64>,
    created_at: i64,
    total_amount: String,
    status: TransactionStatus,
}

impl TransactionRow {
    fn into_transaction(self, items: Vec<TransactionItem>) -> RepoResult<Transaction> {
        Ok(Transaction {
            total_amount: parse_money("transactions.total_amount", &self.total_amount)?,
            id: self.id,
            user_id: self.user_id,
            order_id: self.order_id,
            created_at: self.created_at,
            status: self.status,
            items,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TransactionItemRow {
    id: i64,
    transaction_id: i64,
    product_id: i64,
    product_name: Option<String>,
    quantity: i32,
    unit_price: String,
    total_price: String,
}

impl TryFrom<TransactionItemRow> for TransactionItem {
    type Error = RepoError;

    fn try_from(row: TransactionItemRow) -> RepoResult<Self> {
        Ok(TransactionItem {
            unit_price: parse_money("transaction_item.unit_price", &row.unit_price)?,
            total_price: parse_money("transaction_item.total_price", &row.total_price)?,
            id: row.id,
            transaction_id: row.transaction_id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            product: None,
        })
    }
}

/// All transactions, newest first, with items
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Transaction>> {
    let sql = format!("SELECT {TX_COLUMNS} FROM transactions ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, TransactionRow>(&sql)
        .fetch_all(pool)
        .await?;

    let sql = format!("SELECT {ITEM_COLUMNS} FROM transaction_item ORDER BY transaction_id, id");
    let item_rows = sqlx::query_as::<_, TransactionItemRow>(&sql)
        .fetch_all(pool)
        .await?;

    let mut by_tx: HashMap<i64, Vec<TransactionItem>> = HashMap::new();
    for row in item_rows {
        let item = TransactionItem::try_from(row)?;
        by_tx.entry(item.transaction_id).or_default().push(item);
    }

    rows.into_iter()
        .map(|row| {
            let items = by_tx.remove(&row.id).unwrap_or_default();
            row.into_transaction(items)
        })
        .collect()
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Transaction>> {
    let sql = format!("SELECT {TX_COLUMNS} FROM transactions WHERE id = ?");
    let Some(row) = sqlx::query_as::<_, TransactionRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let sql = format!("SELECT {ITEM_COLUMNS} FROM transaction_item WHERE transaction_id = ? ORDER BY id");
    let items = sqlx::query_as::<_, TransactionItemRow>(&sql)
        .bind(id)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(TransactionItem::try_from)
        .collect::<RepoResult<Vec<_>>>()?;

    row.into_transaction(items).map(Some)
}

pub async fn find_by_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Option<Transaction>> {
    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM transactions WHERE order_id = ?")
        .bind(order_id)
        .fetch_optional(pool)
        .await?;
    match id {
        Some(id) => find_by_id(pool, id).await,
        None => Ok(None),
    }
}

pub async fn find_item(pool: &SqlitePool, item_id: i64) -> RepoResult<Option<TransactionItem>> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM transaction_item WHERE id = ?");
    let row = sqlx::query_as::<_, TransactionItemRow>(&sql)
        .bind(item_id)
        .fetch_optional(pool)
        .await?;
    row.map(TransactionItem::try_from).transpose()
}

/// Insert transaction and items (caller owns the transaction)
///
/// A second transaction for the same order violates the unique
/// `order_id` index and surfaces as [`RepoError::Duplicate`].
pub async fn insert(conn: &mut SqliteConnection, txn: &Transaction) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO transactions (id, user_id, order_id, created_at, total_amount, status) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(txn.id)
    .bind(txn.user_id)
    .bind(txn.order_id)
    .bind(txn.created_at)
    .bind(to_storage(txn.total_amount))
    .bind(txn.status)
    .execute(&mut *conn)
    .await?;

    for item in &txn.items {
        sqlx::query(
            "INSERT INTO transaction_item (id, transaction_id, product_id, product_name, quantity, unit_price, total_price) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(item.id)
        .bind(txn.id)
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

/// 先删明细再删交易 (同一事务)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM transaction_item WHERE transaction_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query("DELETE FROM transactions WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Ok(false);
    }
    tx.commit().await?;
    Ok(true)
}
