//! 订单生命周期管理
//!
//! # 状态机
//!
//! ```text
//! Pending ──process──▶ Completed   (生成交易)
//!    └─────void──────▶ Voided
//! ```
//!
//! `Completed` 与 `Voided` 为终态。结账与作废都以条件更新
//! (`WHERE status = 'Pending'`) 开始事务，先拿到 SQLite 写锁再读取，
//! 因此同一订单的并发结账只会有一个成功；`transactions.order_id`
//! 唯一索引是第二道防线。

use shared::models::{Order, OrderCreate, OrderItem, OrderStatus, Transaction, TransactionItem, TransactionStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

use crate::core::PricingPolicy;
use crate::db::repository::{RepoError, order, product, transaction};
use crate::money;
use crate::pricing;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// 订单管理器
///
/// 持有连接池句柄，克隆成本低。
#[derive(Clone, Debug)]
pub struct OrdersManager {
    pool: SqlitePool,
    policy: PricingPolicy,
}

impl OrdersManager {
    pub fn new(pool: SqlitePool, policy: PricingPolicy) -> Self {
        Self { pool, policy }
    }

    /// Create a `Pending` order at a table
    pub async fn create(&self, req: OrderCreate, actor: Option<i64>) -> AppResult<Order> {
        if req.table_number <= 0 {
            return Err(AppError::new(ErrorCode::InvalidTableNumber).with_fields(["tableNumber"]));
        }
        validate_optional_text(&req.notes, "notes", MAX_NOTE_LEN)?;

        let lines = pricing::price_lines(&self.pool, self.policy, &req.items).await?;

        let order_id = snowflake_id();
        let items: Vec<OrderItem> = lines
            .iter()
            .map(|line| OrderItem {
                id: snowflake_id(),
                order_id,
                product_id: line.product_id,
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                total_price: line.total_price,
                product: None,
            })
            .collect();
        let new_order = Order {
            id: order_id,
            created_at: now_millis(),
            table_number: req.table_number,
            total_amount: pricing::total_of(&lines),
            status: OrderStatus::Pending,
            notes: req.notes,
            created_by: actor,
            items,
        };

        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        order::insert(&mut *tx, &new_order).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            order_id,
            table = new_order.table_number,
            total = %new_order.total_amount,
            actor = ?actor,
            "Order created"
        );
        self.get(order_id).await
    }

    /// Order with items and each item's current product
    pub async fn get(&self, id: i64) -> AppResult<Order> {
        let mut found = order::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| order_not_found(id))?;
        self.attach_products(std::slice::from_mut(&mut found)).await?;
        Ok(found)
    }

    /// All orders, newest first
    pub async fn list(&self) -> AppResult<Vec<Order>> {
        let mut orders = order::find_all(&self.pool).await?;
        self.attach_products(&mut orders).await?;
        Ok(orders)
    }

    /// Process a `Pending` order into a `Completed` transaction
    ///
    /// Runs in one database transaction; items are copied as snapshots.
    pub async fn process(&self, id: i64, actor: Option<i64>) -> AppResult<Transaction> {
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;

        transition(&mut *tx, id, OrderStatus::Completed).await?;

        let items = order::find_items(&mut *tx, id).await?;
        let txn_id = snowflake_id();
        let txn_items: Vec<TransactionItem> = items
            .iter()
            .map(|item| TransactionItem {
                id: snowflake_id(),
                transaction_id: txn_id,
                product_id: item.product_id,
                product_name: item.product_name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                total_price: item.total_price,
                product: None,
            })
            .collect();
        let txn = Transaction {
            id: txn_id,
            user_id: actor,
            order_id: Some(id),
            created_at: now_millis(),
            total_amount: money::sum_totals(txn_items.iter().map(|i| i.total_price)),
            status: TransactionStatus::Completed,
            items: txn_items,
        };

        transaction::insert(&mut *tx, &txn).await.map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::TransactionAlreadyRecorded),
            other => other.into(),
        })?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(order_id = id, transaction_id = txn_id, total = %txn.total_amount, actor = ?actor, "Order processed");

        let mut recorded = transaction::find_by_id(&self.pool, txn_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::TransactionNotFound))?;
        crate::ledger::attach_products(&self.pool, std::slice::from_mut(&mut recorded)).await?;
        Ok(recorded)
    }

    /// The transaction recorded when this order was processed
    pub async fn recorded_transaction(&self, id: i64) -> AppResult<Transaction> {
        if order::find_status(&self.pool, id).await?.is_none() {
            return Err(order_not_found(id));
        }
        let mut recorded = transaction::find_by_order(&self.pool, id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::TransactionNotFound,
                    format!("Order {id} has no recorded transaction"),
                )
            })?;
        crate::ledger::attach_products(&self.pool, std::slice::from_mut(&mut recorded)).await?;
        Ok(recorded)
    }

    /// Void a `Pending` order
    pub async fn void(&self, id: i64, actor: Option<i64>) -> AppResult<Order> {
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        transition(&mut *tx, id, OrderStatus::Voided).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(order_id = id, actor = ?actor, "Order voided");
        self.get(id).await
    }

    /// Delete an order and its items; `false` when absent
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let deleted = order::delete(&self.pool, id).await?;
        if deleted {
            tracing::info!(order_id = id, "Order deleted");
        }
        Ok(deleted)
    }

    async fn attach_products(&self, orders: &mut [Order]) -> AppResult<()> {
        let ids: Vec<i64> = orders
            .iter()
            .flat_map(|o| o.items.iter().map(|i| i.product_id))
            .collect();
        let catalog = product::find_map(&self.pool, &ids).await?;
        for item in orders.iter_mut().flat_map(|o| o.items.iter_mut()) {
            item.product = catalog.get(&item.product_id).cloned();
        }
        Ok(())
    }
}

/// Conditional `Pending → target`; classifies a miss as not-found or conflict
async fn transition(conn: &mut SqliteConnection, id: i64, target: OrderStatus) -> AppResult<()> {
    if !OrderStatus::Pending.can_transition_to(target) {
        return Err(invalid_transition(OrderStatus::Pending, target));
    }
    if order::update_status_if(conn, id, OrderStatus::Pending, target).await? {
        return Ok(());
    }

    match order::find_status(&mut *conn, id).await? {
        None => Err(order_not_found(id)),
        Some(OrderStatus::Completed) => Err(AppError::new(ErrorCode::OrderAlreadyCompleted)),
        Some(OrderStatus::Voided) => Err(AppError::new(ErrorCode::OrderAlreadyVoided)),
        Some(current) => Err(invalid_transition(current, target)),
    }
}

fn invalid_transition(from: OrderStatus, to: OrderStatus) -> AppError {
    AppError::with_message(
        ErrorCode::InvalidStatusTransition,
        format!("Order cannot move from {from} to {to}"),
    )
}

fn order_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
}
