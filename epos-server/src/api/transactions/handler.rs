//! Transaction API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppJson, AppResult, ErrorCode};
use shared::models::{Transaction, TransactionCreate, TransactionItem};

/// GET /api/transactions - 所有交易 (新到旧)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Transaction>>> {
    let txns = state.ledger.list().await?;
    Ok(Json(txns))
}

/// GET /api/transactions/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Transaction>> {
    let txn = state.ledger.get(id).await?;
    Ok(Json(txn))
}

/// GET /api/transactions/items/{itemId}
pub async fn get_item(
    State(state): State<ServerState>,
    Path(item_id): Path<i64>,
) -> AppResult<Json<TransactionItem>> {
    let item = state.ledger.get_item(item_id).await?;
    Ok(Json(item))
}

/// POST /api/transactions - 直接记账
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    AppJson(payload): AppJson<TransactionCreate>,
) -> AppResult<impl IntoResponse> {
    let txn = state.ledger.create(payload, Some(current_user.id)).await?;
    let location = format!("/api/transactions/{}", txn.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(txn)))
}

/// DELETE /api/transactions/{id}
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if !state.ledger.delete(id).await? {
        return Err(AppError::with_message(
            ErrorCode::TransactionNotFound,
            format!("Transaction {id} not found"),
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}
