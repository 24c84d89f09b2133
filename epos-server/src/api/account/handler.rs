//! Account Handlers
//!
//! 登录失败统一返回 400 "Invalid login attempt"，不区分用户不存在、
//! 账户停用与密码错误。

use std::time::Duration;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::auth::CurrentUser;
use crate::auth::password::{hash_password, verify_password};
use crate::core::ServerState;
use crate::db::repository::{role, user};
use crate::security_log;
use crate::utils::validation::{MAX_PASSWORD_LEN, validate_required_text};
use crate::utils::{AppError, AppJson, AppResult, ErrorCode};
use shared::client::{LoginRequest, LoginResponse, QuickLoginRequest, SetPasswordRequest};
use shared::models::{Role, User};

/// Fixed delay for authentication to blunt timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 100;

/// POST /api/account/login - 用户名密码登录
pub async fn login(
    State(state): State<ServerState>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let found = user::find_by_name(&state.pool, req.user_name.trim()).await?;
    authenticate(&state, found, &req.password, &req.user_name).await
}

/// POST /api/account/login/{userId} - POS 快速登录
pub async fn quick_login(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
    AppJson(req): AppJson<QuickLoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let found = user::find_by_id(&state.pool, user_id).await?;
    authenticate(&state, found, &req.password, &user_id.to_string()).await
}

async fn authenticate(
    state: &ServerState,
    found: Option<User>,
    password: &str,
    login_name: &str,
) -> AppResult<Json<LoginResponse>> {
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let account = match found {
        Some(u) if u.is_active && verify_password(password, &u.password_hash) => u,
        Some(u) => {
            let reason = if u.is_active { "invalid_password" } else { "account_disabled" };
            security_log!("WARN", "login_failed", login = login_name.to_string(), reason = reason);
            return Err(AppError::invalid_credentials());
        }
        None => {
            security_log!("WARN", "login_failed", login = login_name.to_string(), reason = "user_not_found");
            return Err(AppError::invalid_credentials());
        }
    };

    let roles = role::find_by_user(&state.pool, account.id).await?;
    let primary_role = roles.first().map(|r| r.name.clone()).unwrap_or_default();
    let mut permissions: Vec<String> = Vec::new();
    for p in roles.iter().flat_map(|r| r.permissions.iter()) {
        if !permissions.contains(p) {
            permissions.push(p.clone());
        }
    }

    let token = state
        .get_jwt_service()
        .generate_token(account.id, &account.user_name, &primary_role, &permissions)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = account.id, user_name = %account.user_name, role = %primary_role, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: account,
    }))
}

/// GET /api/account/me - 当前用户 (含角色)
pub async fn me(State(state): State<ServerState>, current_user: CurrentUser) -> AppResult<Json<User>> {
    let found = user::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(found))
}

/// GET /api/account/role - 所有角色
pub async fn list_roles(State(state): State<ServerState>) -> AppResult<Json<Vec<Role>>> {
    let roles = role::find_all(&state.pool).await?;
    Ok(Json(roles))
}

/// POST /api/account/passw/{id} - 设置用户密码
pub async fn set_password(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    AppJson(req): AppJson<SetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_required_text(&req.password, "password", MAX_PASSWORD_LEN)?;

    let hash = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
    if !user::set_password(&state.pool, id, &hash).await? {
        return Err(AppError::new(ErrorCode::UserNotFound));
    }

    security_log!("INFO", "password_set", user_id = id, by = current_user.id);
    Ok(StatusCode::NO_CONTENT)
}
