//! ErrorCode → HTTP status

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Status used for the error body; anything unlisted is a 400
    pub fn http_status(&self) -> StatusCode {
        use ErrorCode::*;

        match self {
            Success => StatusCode::OK,

            NotAuthenticated | TokenExpired | TokenInvalid => StatusCode::UNAUTHORIZED,
            PermissionDenied | AdminRequired => StatusCode::FORBIDDEN,

            NotFound | OrderNotFound | TransactionNotFound | TransactionItemNotFound
            | ProductNotFound | CategoryNotFound | UserNotFound | RoleNotFound => {
                StatusCode::NOT_FOUND
            }

            AlreadyExists | OrderAlreadyCompleted | OrderAlreadyVoided
            | InvalidStatusTransition | TransactionAlreadyRecorded | CategoryNameExists
            | UserNameExists => StatusCode::CONFLICT,

            TimeoutError => StatusCode::REQUEST_TIMEOUT,
            Unknown | InternalError | DatabaseError | ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // validation, bad login, business rule violations
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ErrorCode::Success, StatusCode::OK),
            (ErrorCode::ValidationFailed, StatusCode::BAD_REQUEST),
            (ErrorCode::OrderEmpty, StatusCode::BAD_REQUEST),
            (ErrorCode::ProductInactive, StatusCode::BAD_REQUEST),
            (ErrorCode::InvalidTableNumber, StatusCode::BAD_REQUEST),
            // bad login is a plain 400, not 401
            (ErrorCode::InvalidCredentials, StatusCode::BAD_REQUEST),
            (ErrorCode::NotAuthenticated, StatusCode::UNAUTHORIZED),
            (ErrorCode::TokenExpired, StatusCode::UNAUTHORIZED),
            (ErrorCode::PermissionDenied, StatusCode::FORBIDDEN),
            (ErrorCode::AdminRequired, StatusCode::FORBIDDEN),
            (ErrorCode::OrderNotFound, StatusCode::NOT_FOUND),
            (ErrorCode::TransactionItemNotFound, StatusCode::NOT_FOUND),
            (ErrorCode::OrderAlreadyCompleted, StatusCode::CONFLICT),
            (ErrorCode::OrderAlreadyVoided, StatusCode::CONFLICT),
            (ErrorCode::TransactionAlreadyRecorded, StatusCode::CONFLICT),
            (ErrorCode::UserNameExists, StatusCode::CONFLICT),
            (ErrorCode::TimeoutError, StatusCode::REQUEST_TIMEOUT),
            (ErrorCode::DatabaseError, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            assert_eq!(code.http_status(), status, "{code:?}");
        }
    }
}
