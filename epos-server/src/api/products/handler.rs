//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::repository::{category, product};
use crate::money::validate_price;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppJson, AppResult, ErrorCode};
use shared::models::{Product, ProductSave};

/// GET /api/products - 获取所有商品
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let products = product::find_all(&state.pool).await?;
    Ok(Json(products))
}

/// GET /api/products/{id} - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let found = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(Json(found))
}

/// POST /api/products - 创建或更新商品
pub async fn save(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<ProductSave>,
) -> AppResult<Json<Product>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_price(payload.price, "price")?;
    validate_optional_text(&payload.image_url, "imageUrl", MAX_URL_LEN)?;

    if let Some(category_id) = payload.category_id
        && category::find_by_id(&state.pool, category_id).await?.is_none()
    {
        return Err(AppError::new(ErrorCode::CategoryNotFound).with_fields(["categoryId"]));
    }

    let saved = product::save(&state.pool, payload).await?;
    tracing::info!(product_id = saved.id, name = %saved.name, price = %saved.price, "Product saved");
    Ok(Json(saved))
}

/// DELETE /api/products/{id} - 删除商品
///
/// 订单与交易明细保留名称与单价快照。
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if !product::delete(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::ProductNotFound));
    }
    tracing::info!(product_id = id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
