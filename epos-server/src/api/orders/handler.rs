//! Order API Handlers
//!
//! 业务规则在 [`OrdersManager`](crate::orders::OrdersManager)，这里只做 HTTP 映射。

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppJson, AppResult, ErrorCode};
use shared::models::{Order, OrderCreate, Transaction};

/// GET /api/orders - 所有订单 (新到旧)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.list().await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = state.orders.get(id).await?;
    Ok(Json(order))
}

/// POST /api/orders - 创建订单
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    AppJson(payload): AppJson<OrderCreate>,
) -> AppResult<Json<Order>> {
    let order = state.orders.create(payload, Some(current_user.id)).await?;
    Ok(Json(order))
}

/// POST /api/orders/{id}/process - 结账
pub async fn process(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let txn = state.orders.process(id, Some(current_user.id)).await?;
    let location = format!("/api/transactions/{}", txn.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(txn)))
}

/// GET /api/orders/{id}/transaction - 结账生成的交易
pub async fn recorded_transaction(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Transaction>> {
    let txn = state.orders.recorded_transaction(id).await?;
    Ok(Json(txn))
}

/// POST /api/orders/{id}/void - 作废
pub async fn void(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = state.orders.void(id, Some(current_user.id)).await?;
    Ok(Json(order))
}

/// DELETE /api/orders/{id}
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if !state.orders.delete(id).await? {
        return Err(AppError::with_message(
            ErrorCode::OrderNotFound,
            format!("Order {id} not found"),
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}
