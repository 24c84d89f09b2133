use std::path::PathBuf;
use std::str::FromStr;

use crate::auth::JwtConfig;
use crate::core::{Result, ServerError};

/// 订单/交易行项目的定价来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PricingPolicy {
    /// 从商品目录重新取价 (名称、单价快照)
    #[default]
    Catalog,
    /// 信任客户端提交的单价，但重新计算行合计
    Client,
}

impl FromStr for PricingPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "catalog" => Ok(Self::Catalog),
            "client" => Ok(Self::Client),
            other => Err(format!("unknown pricing policy: {other}")),
        }
    }
}

impl std::fmt::Display for PricingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Catalog => f.write_str("catalog"),
            Self::Client => f.write_str("client"),
        }
    }
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 |
/// | DATABASE_PATH | WORK_DIR/epos.db | SQLite 数据库文件 |
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | ROOT_PASSWORD | (无) | root 账户初始密码 |
/// | PRICING_POLICY | catalog | 定价策略: catalog / client |
///
/// JWT 相关变量见 [`JwtConfig`]。生产环境或 release 构建必须提供合法的
/// `JWT_SECRET`，否则启动失败。
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/epos HTTP_PORT=8080 ROOT_PASSWORD=changeme cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// 数据库文件路径 (为空时使用 work_dir/epos.db)
    pub database_path: Option<String>,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// root 账户密码 (为空时不创建 root 账户)
    pub root_password: Option<String>,
    /// 行项目定价策略
    pub pricing_policy: PricingPolicy,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的变量使用默认值；JWT 密钥不合法时返回 [`ServerError::Config`]
    pub fn from_env() -> Result<Self> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let allow_generated = cfg!(debug_assertions) && environment != "production";
        let jwt = JwtConfig::from_env(allow_generated).map_err(|e| ServerError::Config(e.to_string()))?;

        Ok(Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            database_path: std::env::var("DATABASE_PATH").ok().filter(|p| !p.is_empty()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            jwt,
            environment,
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            root_password: std::env::var("ROOT_PASSWORD").ok().filter(|p| !p.is_empty()),
            pricing_policy: match std::env::var("PRICING_POLICY") {
                Ok(v) => v.parse().unwrap_or_else(|e| {
                    tracing::warn!("{e}, falling back to catalog pricing");
                    PricingPolicy::Catalog
                }),
                Err(_) => PricingPolicy::Catalog,
            },
        })
    }

    /// 数据库文件路径
    pub fn database_file(&self) -> PathBuf {
        match &self.database_path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.work_dir).join("epos.db"),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_policy_parse() {
        assert_eq!("catalog".parse::<PricingPolicy>(), Ok(PricingPolicy::Catalog));
        assert_eq!("Client".parse::<PricingPolicy>(), Ok(PricingPolicy::Client));
        assert!("free".parse::<PricingPolicy>().is_err());
        assert_eq!(PricingPolicy::default(), PricingPolicy::Catalog);
    }

    #[test]
    fn test_database_file_defaults_to_work_dir() {
        let mut config = Config {
            work_dir: "/tmp/epos-test".into(),
            database_path: None,
            http_port: 0,
            jwt: JwtConfig {
                secret: "config-test-secret-at-least-32-characters".into(),
                expiration_minutes: 60,
                issuer: "epos-server".into(),
                audience: "epos-console".into(),
            },
            environment: "production".into(),
            request_timeout_ms: 1000,
            root_password: None,
            pricing_policy: PricingPolicy::Catalog,
        };
        assert!(config.is_production());
        assert_eq!(config.database_file(), PathBuf::from("/tmp/epos-test/epos.db"));

        config.database_path = Some("/var/db/pos.db".into());
        assert_eq!(config.database_file(), PathBuf::from("/var/db/pos.db"));
    }
}
