//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`account`] - 登录、当前用户、角色、密码
//! - [`users`] - 用户管理接口
//! - [`categories`] - 分类管理接口
//! - [`products`] - 商品管理接口
//! - [`orders`] - 订单生命周期接口
//! - [`transactions`] - 交易账本接口

pub mod account;
pub mod health;
pub mod users;

// Catalog
pub mod categories;
pub mod products;

// Orders & ledger
pub mod orders;
pub mod transactions;

// Re-export common types for handlers
pub use crate::utils::{AppJson, AppResult};
