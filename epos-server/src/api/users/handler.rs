//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::auth::CurrentUser;
use crate::auth::password::hash_password;
use crate::core::ServerState;
use crate::db::repository::{RepoError, user};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppJson, AppResult, ErrorCode};
use shared::models::{User, UserSave};

/// GET /api/user - 获取所有用户
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    let users = user::find_all(&state.pool).await?;
    Ok(Json(users))
}

/// GET /api/user/{id} - 获取单个用户
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    let found = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(found))
}

/// POST /api/user - 创建或更新用户
///
/// 密码仅在提交时更新；角色按名称整体替换。
pub async fn save(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    AppJson(payload): AppJson<UserSave>,
) -> AppResult<Json<User>> {
    validate_required_text(&payload.user_name, "userName", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.full_name, "fullName", MAX_NAME_LEN)?;
    validate_required_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(&payload.phone_number, "phoneNumber", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.password, "password", MAX_PASSWORD_LEN)?;

    let password_hash = match payload.password.as_deref() {
        Some(pw) if !pw.is_empty() => Some(
            hash_password(pw)
                .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?,
        ),
        _ => None,
    };

    let saved = user::save(&state.pool, payload, password_hash)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => {
                AppError::new(ErrorCode::UserNameExists).with_fields(["userName"])
            }
            other => other.into(),
        })?;

    tracing::info!(user_id = saved.id, user_name = %saved.user_name, by = current_user.id, "User saved");
    Ok(Json(saved))
}

/// DELETE /api/user/{id} - 删除用户
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if id == current_user.id {
        return Err(AppError::validation("Cannot delete the signed-in user"));
    }
    if !user::delete(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::UserNotFound));
    }
    tracing::info!(user_id = id, by = current_user.id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
