//! 交易账本
//!
//! 已完成销售的记录：可直接创建，也可由订单结账生成。
//! 只追加与删除，不提供更新。

use shared::models::{Transaction, TransactionCreate, TransactionItem};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use crate::core::PricingPolicy;
use crate::db::repository::{RepoError, product, transaction};
use crate::pricing;
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Clone, Debug)]
pub struct Ledger {
    pool: SqlitePool,
    policy: PricingPolicy,
}

impl Ledger {
    pub fn new(pool: SqlitePool, policy: PricingPolicy) -> Self {
        Self { pool, policy }
    }

    /// Record a sale; status defaults to `Completed`
    pub async fn create(&self, req: TransactionCreate, actor: Option<i64>) -> AppResult<Transaction> {
        let lines = pricing::price_lines(&self.pool, self.policy, &req.items).await?;

        let txn_id = snowflake_id();
        let items = lines
            .iter()
            .map(|line| TransactionItem {
                id: snowflake_id(),
                transaction_id: txn_id,
                product_id: line.product_id,
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                total_price: line.total_price,
                product: None,
            })
            .collect();
        let txn = Transaction {
            id: txn_id,
            user_id: actor,
            order_id: None,
            created_at: now_millis(),
            total_amount: pricing::total_of(&lines),
            status: req.status.unwrap_or_default(),
            items,
        };

        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        transaction::insert(&mut *tx, &txn).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(transaction_id = txn_id, total = %txn.total_amount, status = %txn.status, actor = ?actor, "Transaction recorded");
        self.get(txn_id).await
    }

    pub async fn get(&self, id: i64) -> AppResult<Transaction> {
        let mut txn = transaction::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::TransactionNotFound, format!("Transaction {id} not found"))
            })?;
        attach_products(&self.pool, std::slice::from_mut(&mut txn)).await?;
        Ok(txn)
    }

    /// All transactions, newest first
    pub async fn list(&self) -> AppResult<Vec<Transaction>> {
        let mut txns = transaction::find_all(&self.pool).await?;
        attach_products(&self.pool, &mut txns).await?;
        Ok(txns)
    }

    /// Delete a transaction and its items; `false` when absent
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let deleted = transaction::delete(&self.pool, id).await?;
        if deleted {
            tracing::info!(transaction_id = id, "Transaction deleted");
        }
        Ok(deleted)
    }

    /// Single ledger line by id
    pub async fn get_item(&self, item_id: i64) -> AppResult<TransactionItem> {
        let mut item = transaction::find_item(&self.pool, item_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::TransactionItemNotFound,
                    format!("Transaction item {item_id} not found"),
                )
            })?;
        item.product = product::find_by_id(&self.pool, item.product_id).await?;
        Ok(item)
    }
}

/// Attach each line's current catalog product (display only)
pub(crate) async fn attach_products(pool: &SqlitePool, txns: &mut [Transaction]) -> AppResult<()> {
    let ids: Vec<i64> = txns
        .iter()
        .flat_map(|t| t.items.iter().map(|i| i.product_id))
        .collect();
    let catalog = product::find_map(pool, &ids).await?;
    for item in txns.iter_mut().flat_map(|t| t.items.iter_mut()) {
        item.product = catalog.get(&item.product_id).cloned();
    }
    Ok(())
}
