//! Order API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/orders | GET / POST | 列表 / 创建 (Pending) |
//! | /api/orders/{id} | GET / DELETE | 详情 / 删除 |
//! | /api/orders/{id}/process | POST | 结账，生成交易 (201 + Location) |
//! | /api/orders/{id}/transaction | GET | 结账生成的交易 |
//! | /api/orders/{id}/void | POST | 作废 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/process", post(handler::process))
        .route("/{id}/transaction", get(handler::recorded_transaction))
        .route("/{id}/void", post(handler::void))
}
