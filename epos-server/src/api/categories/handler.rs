//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::repository::{RepoError, category, product};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppJson, AppResult, ErrorCode};
use shared::models::{Category, CategorySave};

/// GET /api/categories - 获取所有分类
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /api/categories/{id} - 获取分类及其商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let mut found = category::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    found.products = product::find_by_category(&state.pool, id).await?;
    Ok(Json(found))
}

/// POST /api/categories - 创建或更新分类
pub async fn save(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<CategorySave>,
) -> AppResult<Json<Category>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.icon, "icon", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.button_text, "buttonText", MAX_SHORT_TEXT_LEN)?;

    let saved = category::save(&state.pool, payload)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => {
                AppError::new(ErrorCode::CategoryNameExists).with_fields(["name"])
            }
            other => other.into(),
        })?;
    tracing::info!(category_id = saved.id, name = %saved.name, "Category saved");
    Ok(Json(saved))
}

/// DELETE /api/categories/{id} - 删除分类 (商品保留，categoryId 置空)
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if !category::delete(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::CategoryNotFound));
    }
    tracing::info!(category_id = id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}
