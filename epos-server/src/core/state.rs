use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::{Config, PricingPolicy, Result};
use crate::db::{DbService, seed};
use crate::ledger::Ledger;
use crate::orders::OrdersManager;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc / 连接池句柄实现浅拷贝，每个请求克隆一次。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | orders | OrdersManager | 订单生命周期 |
/// | ledger | Ledger | 交易账本 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 订单生命周期管理
    pub orders: OrdersManager,
    /// 交易账本
    pub ledger: Ledger,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替；测试中配合
    /// [`DbService::in_memory`] 使用。
    pub fn new(config: Config, db: DbService) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let orders = OrdersManager::new(db.pool.clone(), config.pricing_policy);
        let ledger = Ledger::new(db.pool.clone(), config.pricing_policy);
        Self {
            config,
            pool: db.pool,
            jwt_service,
            orders,
            ledger,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录
    /// 2. 数据库 (迁移)
    /// 3. 系统角色与 root 账户
    pub async fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;

        let db_path = config.database_file();
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        seed::ensure_system_roles(&db.pool).await?;
        match &config.root_password {
            Some(password) => seed::ensure_root_user(&db.pool, password).await?,
            None => tracing::warn!("ROOT_PASSWORD not set, skipping root user seeding"),
        }

        tracing::info!(pricing_policy = %config.pricing_policy, "Pricing policy configured");
        if config.is_production() && config.pricing_policy == PricingPolicy::Client {
            tracing::warn!("Client pricing in production: unit prices are taken from the request");
        }

        Ok(Self::new(config.clone(), db))
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
