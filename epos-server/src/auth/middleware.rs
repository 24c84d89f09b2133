//! 认证 / 授权中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::extractor::authenticate;
use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::security_log;
use crate::utils::ErrorCode;

/// 登录接口前缀 (无需认证)
const LOGIN_PATH: &str = "/api/account/login";

/// `/api/account/login` 与 `/api/account/login/{userId}`
fn is_public_api_route(path: &str) -> bool {
    match path.strip_prefix(LOGIN_PATH) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// 认证中间件
///
/// 校验 Bearer 令牌并把 [`CurrentUser`] 放入请求扩展。
/// CORS 预检、非 `/api/` 路径 (如 `/health`) 和登录接口直接放行。
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();
    let open = req.method() == http::Method::OPTIONS
        || !path.starts_with("/api/")
        || is_public_api_route(path);

    if !open {
        let user = authenticate(&state.get_jwt_service(), req.headers(), req.uri())?;
        req.extensions_mut().insert(user);
    }
    Ok(next.run(req).await)
}

fn current_user(req: &Request) -> Result<&CurrentUser, AppError> {
    req.extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::not_authenticated)
}

/// 要求某项权限，缺少时 403 PermissionDenied
///
/// ```ignore
/// .layer(middleware::from_fn_with_state(SYS_ADMIN, require_permission))
/// ```
pub async fn require_permission(
    State(permission): State<&'static str>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = current_user(&req)?;
    if !user.has_permission(permission) {
        security_log!(
            "WARN",
            "permission_denied",
            user_id = user.id,
            username = user.username.clone(),
            required_permission = permission
        );
        return Err(AppError::permission_denied(format!("Permission denied: {permission}")));
    }
    Ok(next.run(req).await)
}

/// 要求 `sys.admin` 角色，否则 403 AdminRequired
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = current_user(&req)?;
    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id,
            username = user.username.clone(),
            user_role = user.role.clone()
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    Ok(next.run(req).await)
}
