//! User API 模块 (仅管理员)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/user", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::save))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .layer(middleware::from_fn(require_admin))
}
