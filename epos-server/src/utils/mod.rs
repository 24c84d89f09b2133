//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`ErrorBody`] - 错误响应体 (from shared::error)
//! - [`AppJson`] - 拒绝时返回统一错误体的 JSON 提取器
//! - 日志、输入校验

pub mod error;
pub mod json;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
pub use json::AppJson;
