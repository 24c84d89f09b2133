//! EPOS Server - 餐厅 POS 后台服务
//!
//! # 架构概述
//!
//! - **数据库** (`db`): SQLite (sqlx) 连接池、迁移和仓储函数
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **订单** (`orders`): 订单生命周期 (创建、结账、作废)
//! - **账本** (`ledger`): 已完成交易记录
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! epos-server/src/
//! ├── core/          # 配置、状态、服务器、错误
//! ├── auth/          # JWT 认证、权限、密码
//! ├── db/            # 数据库层
//! ├── orders/        # 订单生命周期
//! ├── ledger/        # 交易账本
//! ├── money.rs       # 金额计算
//! ├── pricing.rs     # 定价策略
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod ledger;
pub mod money;
pub mod orders;
pub mod pricing;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use crate::core::{Config, Server, ServerState};
pub use ledger::Ledger;
pub use orders::OrdersManager;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ErrorBody, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: 加载 .env、确保工作目录存在、初始化日志
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
    std::fs::create_dir_all(&work_dir)?;

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_json = std::env::var("LOG_JSON").ok().and_then(|v| v.parse().ok());
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_json, log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ______ ____   ____  _____
   / ____// __ \ / __ \/ ___/
  / __/  / /_/ // / / /\__ \
 / /___ / ____// /_/ /___/ /
/_____//_/     \____//____/
        back office
    "#
    );
}
