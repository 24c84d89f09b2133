//! Product API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth::permissions::SYS_ADMIN;
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/", post(handler::save))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn_with_state(SYS_ADMIN, require_permission));

    read_routes.merge(manage_routes)
}
