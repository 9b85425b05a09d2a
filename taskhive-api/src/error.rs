/// Error handling for the API server
///
/// A unified error type that maps the failure taxonomy onto HTTP responses.
/// Handlers return `Result<T, ApiError>`, which converts into a JSON body
/// `{error, message, details?}` with the appropriate status code. Internal
/// detail (store errors, stack context) is logged server-side and never
/// crosses the response boundary.
///
/// Two deliberate departures from common defaults, per the API contract:
/// validation failures and duplicate username/email both return 400, and a
/// missing resource and a non-owned resource share one 404 message.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use taskhive_shared::auth::{jwt::JwtError, middleware::AuthError, password::PasswordError};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request (400)
    BadRequest(String),

    /// Request failed schema validation (400, field-level detail)
    Validation(Vec<ValidationErrorDetail>),

    /// Duplicate username/email (400)
    Conflict(String),

    /// Missing or invalid credentials (401)
    Unauthorized(String),

    /// Authenticated but not allowed (403)
    Forbidden(String),

    /// Resource absent or not owned by the caller (404)
    NotFound(String),

    /// Internal server error (500); message is logged, not returned
    Internal(String),

    /// Dependency unavailable (503)
    ServiceUnavailable(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Human-readable reason
    pub message: String,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "validation_error", "not_found")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Field-level validation detail, when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// The status code this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) | ApiError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error_code, message, details) = match self {
            ApiError::BadRequest(msg) => ("bad_request", msg, None),
            ApiError::Validation(errors) => (
                "validation_error",
                errors
                    .first()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .unwrap_or_else(|| "Request validation failed".to_string()),
                Some(errors),
            ),
            ApiError::Conflict(msg) => ("conflict", msg, None),
            ApiError::Unauthorized(msg) => ("unauthorized", msg, None),
            ApiError::Forbidden(msg) => ("forbidden", msg, None),
            ApiError::NotFound(msg) => ("not_found", msg, None),
            ApiError::Internal(msg) => {
                // Log internal detail but return a generic message.
                tracing::error!("Internal error: {}", msg);
                (
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => ("service_unavailable", msg, None),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Unique constraint violations surface as conflicts.
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("username") || constraint.contains("email") {
                        return ApiError::Conflict(
                            "User with this username or email already exists".to_string(),
                        );
                    }
                }

                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert credential-extraction errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => {
                ApiError::Unauthorized("Missing authorization header".to_string())
            }
            AuthError::InvalidFormat(msg) => ApiError::BadRequest(msg),
            AuthError::InvalidToken(msg) => ApiError::Unauthorized(msg),
        }
    }
}

/// Convert token errors to API errors
///
/// Every token failure collapses to "invalid token"; no detail about why
/// leaves the server.
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            _ => ApiError::Unauthorized("Invalid token".to_string()),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}
