/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which converts to the
/// appropriate status code and body automatically.
///
/// # Response bodies
///
/// - Validation failures (422): `{"message": "Validation failed", "errors": {field: [msgs]}}`
/// - Not found (404) and unauthorized (401): `{"message": ...}`
/// - Everything else: the standard `{"result": false, "status": "error", ...}` envelope
///
/// Internal errors are logged with their detail server-side; clients only
/// ever see a fixed generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Message returned for any unexpected server-side failure
pub const DEFAULT_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Field-level validation messages, keyed by field name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Domain error (400) - e.g. invalid/expired OTP, self-share, wrong current password
    BadRequest(String),

    /// Unauthenticated (401)
    Unauthorized,

    /// Ownership violation (403)
    Forbidden(String),

    /// Resource or username absent (404)
    NotFound(String),

    /// Duplicate email/username (409)
    Conflict(String),

    /// Validation failure (422) with field-level messages
    Validation(FieldErrors),

    /// Internal server error (500); detail is logged, never returned
    Internal(String),
}

impl ApiError {
    /// Builds a validation error for a single field
    pub fn field_error(field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.to_string()]);
        ApiError::Validation(errors)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized => write!(f, "Unauthorized"),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} field(s)", errors.len())
            }
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Standard error envelope used for domain, conflict, and internal errors
fn error_envelope(message: &str) -> Json<serde_json::Value> {
    Json(json!({
        "result": false,
        "status": "error",
        "message": message,
        "errors": [],
    }))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, error_envelope(&msg)).into_response()
            }
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Unauthorized" })),
            )
                .into_response(),
            ApiError::Forbidden(msg) => {
                (StatusCode::FORBIDDEN, error_envelope(&msg)).into_response()
            }
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": msg })),
            )
                .into_response(),
            ApiError::Conflict(msg) => {
                (StatusCode::CONFLICT, error_envelope(&msg)).into_response()
            }
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "message": "Validation failed",
                    "errors": errors,
                })),
            )
                .into_response(),
            ApiError::Internal(detail) => {
                // Log internal errors but never expose details to clients
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_envelope(DEFAULT_ERROR_MESSAGE),
                )
                    .into_response()
            }
        }
    }
}

/// Convert sqlx errors to API errors
///
/// Unique-constraint violations on the users table surface as 409 Conflict
/// with a field-specific message instead of a generic 500.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found.".to_string()),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    let constraint = db_err.constraint().unwrap_or_default();
                    if constraint.contains("email") {
                        ApiError::Conflict("Email already taken.".to_string())
                    } else if constraint.contains("username") {
                        ApiError::Conflict("Username already taken.".to_string())
                    } else {
                        ApiError::Conflict("Resource already exists.".to_string())
                    }
                }
                // e.g. sharing a task id that does not exist
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    ApiError::NotFound("Resource not found.".to_string())
                }
                _ => ApiError::Internal(format!("Database error: {}", db_err)),
            },
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert validator failures into the uniform field→messages structure
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut errors = FieldErrors::new();

        for (field, field_errors) in err.field_errors() {
            let messages = field_errors
                .iter()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("The {} field is invalid.", field))
                })
                .collect();
            errors.insert(field.to_string(), messages);
        }

        ApiError::Validation(errors)
    }
}

/// Convert password-hashing errors to API errors
impl From<taskmate_shared::auth::password::PasswordError> for ApiError {
    fn from(err: taskmate_shared::auth::password::PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Convert mail dispatch errors to API errors
impl From<taskmate_shared::mail::MailError> for ApiError {
    fn from(err: taskmate_shared::mail::MailError) -> Self {
        ApiError::Internal(format!("Mail dispatch failed: {}", err))
    }
}
