//! Centralized error handling.
//!
//! Every failure surfaced by a service maps onto one `AppError` kind, and the
//! kind alone decides the HTTP status and the body shape:
//! `{ success: false, message, errorDetails, stack? }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, RuntimeErr, SqlErr};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// One invalid field reported by request validation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldIssue {
    pub path: String,
    pub message: String,
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("You are not authorized!")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Validation error")]
    InvalidFields(Vec<FieldIssue>),

    // External service errors
    #[error("Database error")]
    Database(#[from] DbErr),

    #[error("Invalid or expired token")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    success: bool,
    message: String,
    error_details: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<String>,
}

/// How a store failure should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreFailure {
    Duplicate,
    MissingReference,
    Unavailable,
    Fatal,
}

fn classify_db_error(err: &DbErr) -> StoreFailure {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => return StoreFailure::Duplicate,
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => return StoreFailure::MissingReference,
        _ => {}
    }

    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => StoreFailure::Unavailable,
        DbErr::Exec(RuntimeErr::SqlxError(e)) | DbErr::Query(RuntimeErr::SqlxError(e))
            if matches!(
                e,
                sea_orm::sqlx::Error::PoolTimedOut
                    | sea_orm::sqlx::Error::PoolClosed
                    | sea_orm::sqlx::Error::Io(_)
            ) =>
        {
            StoreFailure::Unavailable
        }
        _ => StoreFailure::Fatal,
    }
}

impl AppError {
    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::Jwt(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::InvalidFields(_) => StatusCode::BAD_REQUEST,
            AppError::Database(e) => match classify_db_error(e) {
                StoreFailure::Duplicate => StatusCode::CONFLICT,
                StoreFailure::MissingReference => StatusCode::BAD_REQUEST,
                StoreFailure::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                StoreFailure::Fatal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Database(e) if classify_db_error(e) == StoreFailure::Unavailable)
    }

    /// Whether the error is a unique-index violation raised by the store.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, AppError::Database(e) if classify_db_error(e) == StoreFailure::Duplicate)
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Database(e) => match classify_db_error(e) {
                StoreFailure::Duplicate => "Duplicate entry".to_string(),
                StoreFailure::MissingReference => "Referenced record does not exist".to_string(),
                StoreFailure::Unavailable => {
                    tracing::warn!(error = %e, "Database unavailable");
                    "Service temporarily unavailable, please retry".to_string()
                }
                StoreFailure::Fatal => {
                    tracing::error!("Database error: {:?}", e);
                    "Something went wrong!".to_string()
                }
            },
            AppError::Jwt(e) => {
                tracing::debug!("JWT error: {:?}", e);
                self.to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Something went wrong!".to_string()
            }
            _ => self.to_string(),
        }
    }

    fn details(&self) -> Value {
        match self {
            AppError::InvalidFields(issues) => json!(issues),
            AppError::Database(_) if self.is_retryable() => json!({ "retryable": true }),
            _ => Value::Null,
        }
    }

    /// Internal detail, only exposed by debug builds.
    fn stack(&self) -> Option<String> {
        if !cfg!(debug_assertions) {
            return None;
        }
        match self {
            AppError::Database(e) => Some(format!("{:?}", e)),
            AppError::Internal(msg) => Some(msg.clone()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            success: false,
            message: self.user_message(),
            error_details: self.details(),
            stack: self.stack(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(entity))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        AppError::NotFound(entity.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_status_codes() {
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::forbidden("no").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found("Salon").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("taken").status(), StatusCode::CONFLICT);
        assert_eq!(AppError::validation("bad").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_names_the_entity() {
        assert_eq!(AppError::not_found("Salon").to_string(), "Salon not found");
        let missing: Option<u8> = None;
        let err = missing.ok_or_not_found("Counter").unwrap_err();
        assert_eq!(err.to_string(), "Counter not found");
    }

    #[test]
    fn acquire_failures_are_retryable() {
        let err = AppError::from(DbErr::ConnectionAcquire(sea_orm::ConnAcquireErr::Timeout));
        assert!(err.is_retryable());
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.details(), json!({ "retryable": true }));
    }

    #[test]
    fn unknown_store_errors_are_fatal() {
        let err = AppError::from(DbErr::Custom("broken".into()));
        assert!(!err.is_retryable());
        assert!(!err.is_unique_violation());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_details_are_not_in_the_message() {
        let err = AppError::internal("secret connection string");
        assert!(!err.user_message().contains("secret"));
    }
}
