//! Account API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/account/login | POST | 用户名密码登录 | 无 |
//! | /api/account/login/{userId} | POST | POS 快速登录 | 无 |
//! | /api/account/me | GET | 当前用户 | 登录 |
//! | /api/account/role | GET | 所有角色 | 登录 |
//! | /api/account/passw/{id} | POST | 设置密码 | sys.admin |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/account", routes())
}

fn routes() -> Router<ServerState> {
    let public_routes = Router::new()
        .route("/login", post(handler::login))
        .route("/login/{user_id}", post(handler::quick_login));

    let user_routes = Router::new()
        .route("/me", get(handler::me))
        .route("/role", get(handler::list_roles));

    let admin_routes = Router::new()
        .route("/passw/{id}", post(handler::set_password))
        .layer(middleware::from_fn(require_admin));

    public_routes.merge(user_routes).merge(admin_routes)
}
