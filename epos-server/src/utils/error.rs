//! 统一错误处理
//!
//! 错误类型定义在 `shared::error`，这里统一 re-export，handler 只依赖 `crate::utils`。
//!
//! ```ignore
//! Err(AppError::new(ErrorCode::OrderNotFound))
//! ```

pub use shared::error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
