//! Transaction API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/transactions | GET / POST | 列表 / 记账 (201 + Location) |
//! | /api/transactions/{id} | GET / DELETE | 详情 / 删除 |
//! | /api/transactions/items/{itemId} | GET | 单条明细 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/transactions", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/items/{item_id}", get(handler::get_item))
}
