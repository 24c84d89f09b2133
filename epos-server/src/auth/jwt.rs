//! JWT 签发与校验 (HS256)

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::permissions::SYS_ADMIN;

const MIN_SECRET_LEN: usize = 32;

/// JWT 配置
///
/// | 环境变量 | 默认值 |
/// |----------|--------|
/// | JWT_SECRET | 无 (开发环境可自动生成) |
/// | JWT_EXPIRATION_MINUTES | 1440 |
/// | JWT_ISSUER | epos-server |
/// | JWT_AUDIENCE | epos-console |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl JwtConfig {
    /// 从环境变量加载
    ///
    /// `allow_generated` 为真时，缺失或过短的 `JWT_SECRET` 以随机密钥代替；
    /// 否则返回 [`JwtError::ConfigError`]。
    pub fn from_env(allow_generated: bool) -> Result<Self, JwtError> {
        let secret = resolve_secret(std::env::var("JWT_SECRET").ok(), allow_generated)?;
        let env_or = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());

        Ok(Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(24 * 60),
            issuer: env_or("JWT_ISSUER", "epos-server"),
            audience: env_or("JWT_AUDIENCE", "epos-console"),
        })
    }
}

fn resolve_secret(configured: Option<String>, allow_generated: bool) -> Result<String, JwtError> {
    let err = match configured {
        Some(secret) if secret.len() >= MIN_SECRET_LEN => return Ok(secret),
        Some(_) => JwtError::ConfigError(format!(
            "JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"
        )),
        None => JwtError::ConfigError("JWT_SECRET is not set".to_string()),
    };
    if !allow_generated {
        return Err(err);
    }
    tracing::warn!("{err}, using a generated development key");
    Ok(generate_dev_secret())
}

/// 64 个可打印字符的随机密钥，仅用于开发环境
pub fn generate_dev_secret() -> String {
    const CHARSET: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_.~!#$%&*+=?";

    let mut bytes = [0u8; 64];
    if SystemRandom::new().fill(&mut bytes).is_err() {
        return "epos-development-only-secret-change-me-0000000".to_string();
    }
    bytes
        .iter()
        .map(|b| CHARSET[*b as usize % CHARSET.len()] as char)
        .collect()
}

/// 令牌载荷
///
/// `role` 是用户的第一个角色，`permissions` 为所有角色权限的并集 (逗号分隔)。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// user id
    pub sub: String,
    pub username: String,
    pub role: String,
    pub permissions: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

/// 令牌服务，密钥在构造时解析一次
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let secret = config.secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            config,
        }
    }

    pub fn generate_token(
        &self,
        user_id: i64,
        username: &str,
        role: &str,
        permissions: &[String],
    ) -> Result<String, JwtError> {
        let issued = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            permissions: permissions.join(","),
            exp: (issued + Duration::minutes(self.config.expiration_minutes)).timestamp(),
            iat: issued.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 校验签名、过期时间、签发者和受众
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                _ => JwtError::InvalidToken(e.to_string()),
            })
    }

    /// `Bearer <token>` → `<token>`
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
    }
}

/// 已认证的调用者，写操作以 `id` 记为操作人
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub permissions: Vec<String>,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| format!("subject is not a user id: {}", claims.sub))?;

        Ok(Self {
            id,
            username: claims.username,
            role: claims.role,
            permissions: claims
                .permissions
                .split(',')
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect(),
        })
    }
}

impl CurrentUser {
    /// 角色或权限中含 `sys.admin`
    pub fn is_admin(&self) -> bool {
        self.role == SYS_ADMIN || self.permissions.iter().any(|p| p == SYS_ADMIN)
    }

    /// 管理员拥有全部权限；`orders:*` 匹配 `orders:void`
    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_admin()
            || self.permissions.iter().any(|granted| {
                granted == permission
                    || granted.strip_suffix('*').is_some_and(|prefix| {
                        prefix.ends_with(':') && permission.starts_with(prefix)
                    })
            })
    }
}
