//! Repository Module
//!
//! SQLite 数据访问层，按表划分为自由函数 (`fn x(pool, ..) -> RepoResult<T>`)。
//! 多行写入由调用方开启事务，并传入 `&mut SqliteConnection`。

// Catalog
pub mod category;
pub mod product;

// Orders & ledger
pub mod order;
pub mod transaction;

// Identity
pub mod role;
pub mod user;

use std::str::FromStr;

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{1}")]
    Business(ErrorCode, String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return RepoError::Duplicate(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return RepoError::Validation(format!(
                    "Referenced record does not exist: {}",
                    db_err.message()
                ));
            }
        }
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Conflict(msg) => AppError::conflict(msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Business(code, msg) => AppError::with_message(code, msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse a money column (canonical decimal TEXT)
pub(crate) fn parse_money(column: &str, raw: &str) -> RepoResult<Decimal> {
    Decimal::from_str(raw)
        .map_err(|e| RepoError::Database(format!("Corrupt {column} value '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_to_app_error() {
        let e: AppError = RepoError::NotFound("Order 1 not found".into()).into();
        assert_eq!(e.code, ErrorCode::NotFound);
        let e: AppError = RepoError::Duplicate("name".into()).into();
        assert_eq!(e.code, ErrorCode::AlreadyExists);
        let e: AppError = RepoError::Business(ErrorCode::RoleNotFound, "Role x".into()).into();
        assert_eq!(e.code, ErrorCode::RoleNotFound);
        assert_eq!(e.message, "Role x");
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("price", "3.50").unwrap(), Decimal::new(350, 2));
        assert!(parse_money("price", "abc").is_err());
    }
}
