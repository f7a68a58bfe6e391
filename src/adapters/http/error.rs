//! API error type and status mapping.
//!
//! Every failure leaves the API as `{"error": "...", "code": "..."}`.
//!
//! | Category | Status |
//! |----------|--------|
//! | Validation, signature, already purchased/subscribed, bad state | 400 |
//! | Missing or invalid token | 401 |
//! | Banned account, admin-only route | 403 |
//! | Missing resources | 404 |
//! | Duplicate slug | 409 |
//! | Gateway, storage, configuration, database | 500 |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::commerce::CommerceError;
use crate::domain::foundation::{AuthError, DomainError, ErrorCode};

/// JSON error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed.to_string(), message)
    }

    pub fn not_found(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code.to_string(), message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized.to_string(), message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, ErrorCode::Forbidden.to_string(), message)
    }

    fn from_code(code: ErrorCode, message: String) -> Self {
        let status = status_for(code);
        if status.is_server_error() {
            tracing::error!(code = %code, error = %message, "Request failed");
        }
        // Gateway messages are passed through; internal ones are not.
        let message = match code {
            ErrorCode::DatabaseError | ErrorCode::InternalError => "Internal server error".to_string(),
            _ => message,
        };
        Self::new(status, code.to_string(), message)
    }
}

/// Parses an identifier taken from the path or body.
pub fn parse_id<T: std::str::FromStr>(value: &str, field: &str) -> Result<T, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid {}: '{}'", field, value)))
}

/// HTTP status for a domain error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed
        | ErrorCode::InvalidSignature
        | ErrorCode::AlreadyPurchased
        | ErrorCode::AlreadySubscribed
        | ErrorCode::NotPurchasable
        | ErrorCode::InvalidStateTransition => StatusCode::BAD_REQUEST,

        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,

        ErrorCode::ContentNotFound
        | ErrorCode::UserNotFound
        | ErrorCode::PaymentNotFound
        | ErrorCode::PlanNotFound
        | ErrorCode::SubscriptionNotFound
        | ErrorCode::CommentNotFound
        | ErrorCode::MediaNotFound => StatusCode::NOT_FOUND,

        ErrorCode::SlugTaken => StatusCode::CONFLICT,

        ErrorCode::GatewayNotConfigured
        | ErrorCode::GatewayError
        | ErrorCode::StorageError
        | ErrorCode::DatabaseError
        | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::from_code(err.code, err.message)
    }
}

impl From<CommerceError> for ApiError {
    fn from(err: CommerceError) -> Self {
        Self::from_code(err.code(), err.message())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Banned => Self::new(StatusCode::FORBIDDEN, "ACCOUNT_BANNED", "Account is banned"),
            AuthError::TokenExpired => Self::unauthorized("Token expired"),
            AuthError::InvalidToken | AuthError::UserNotFound => Self::unauthorized("Invalid token"),
            AuthError::ServiceUnavailable(msg) => {
                tracing::error!(error = %msg, "Auth service unavailable");
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "AUTH_UNAVAILABLE",
                    "Authentication service unavailable",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}
