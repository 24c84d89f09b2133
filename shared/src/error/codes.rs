//! Error codes
//!
//! Numeric codes travel in the `code` field of every error body. The
//! leading digit selects the [`ErrorCategory`](super::ErrorCategory):
//! 0 general, 1 auth, 2 permission, 4 order, 5 ledger, 6 catalog,
//! 7 table, 8 identity, 9 system.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! error_codes {
    ($($(#[$doc:meta])* $name:ident = $value:literal => $message:literal,)+) => {
        /// Error code, serialized as its `u16` value
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u16", try_from = "u16")]
        #[repr(u16)]
        pub enum ErrorCode {
            $($(#[$doc])* $name = $value,)+
        }

        impl ErrorCode {
            /// Default English message
            pub const fn message(&self) -> &'static str {
                match self {
                    $(Self::$name => $message,)+
                }
            }
        }

        impl TryFrom<u16> for ErrorCode {
            type Error = InvalidErrorCode;

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok(Self::$name),)+
                    _ => Err(InvalidErrorCode(value)),
                }
            }
        }
    };
}

error_codes! {
    Success = 0 => "Operation completed successfully",
    Unknown = 1 => "An unknown error occurred",
    ValidationFailed = 2 => "Validation failed",
    NotFound = 3 => "Resource not found",
    AlreadyExists = 4 => "Resource already exists",
    InvalidRequest = 5 => "Invalid request",
    /// Malformed JSON body
    InvalidFormat = 6 => "Invalid format",

    NotAuthenticated = 1001 => "Authentication required",
    /// Bad user name or password; never says which
    InvalidCredentials = 1002 => "Invalid login attempt",
    TokenExpired = 1003 => "Token has expired",
    TokenInvalid = 1004 => "Invalid token",

    PermissionDenied = 2001 => "Permission denied",
    AdminRequired = 2003 => "Administrator privileges required",

    OrderNotFound = 4001 => "Order not found",
    OrderAlreadyCompleted = 4002 => "Order has already been completed",
    OrderAlreadyVoided = 4003 => "Order has already been voided",
    OrderEmpty = 4004 => "Order has no items",
    InvalidStatusTransition = 4005 => "Status transition not allowed",

    TransactionNotFound = 5001 => "Transaction not found",
    TransactionItemNotFound = 5002 => "Transaction item not found",
    /// Second transaction for one order
    TransactionAlreadyRecorded = 5003 => "Order already has a transaction",

    ProductNotFound = 6001 => "Product not found",
    ProductInactive = 6002 => "Product is not active",
    CategoryNotFound = 6101 => "Category not found",
    CategoryNameExists = 6102 => "Category name already exists",

    InvalidTableNumber = 7001 => "Table number must be a positive integer",

    UserNotFound = 8001 => "User not found",
    UserNameExists = 8002 => "User name already exists",
    RoleNotFound = 8101 => "Role not found",

    InternalError = 9001 => "Internal server error",
    DatabaseError = 9002 => "Database error",
    ConfigError = 9003 => "Configuration error",
    /// Request exceeded `REQUEST_TIMEOUT_MS`
    TimeoutError = 9004 => "Request timed out",
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A `u16` that names no [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::OrderAlreadyCompleted.code(), 4002);
        assert_eq!(ErrorCode::TransactionItemNotFound.code(), 5002);
        assert_eq!(ErrorCode::CategoryNameExists.code(), 6102);
        assert_eq!(ErrorCode::InvalidTableNumber.code(), 7001);
        assert_eq!(ErrorCode::RoleNotFound.code(), 8101);
        assert_eq!(ErrorCode::TimeoutError.code(), 9004);
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::NotFound.is_success());
    }

    #[test]
    fn test_try_from() {
        assert_eq!(ErrorCode::try_from(4002), Ok(ErrorCode::OrderAlreadyCompleted));
        assert_eq!(ErrorCode::try_from(8101), Ok(ErrorCode::RoleNotFound));
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(8102), Err(InvalidErrorCode(8102)));
    }

    #[test]
    fn test_serde_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::OrderNotFound).unwrap(), "4001");
        let code: ErrorCode = serde_json::from_str("5003").unwrap();
        assert_eq!(code, ErrorCode::TransactionAlreadyRecorded);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
        assert_eq!(ErrorCode::OrderEmpty.to_string(), "4004");
    }

    #[test]
    fn test_messages() {
        assert_eq!(ErrorCode::InvalidCredentials.message(), "Invalid login attempt");
        assert_eq!(ErrorCode::OrderAlreadyVoided.message(), "Order has already been voided");
    }
}
