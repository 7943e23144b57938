//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into the error envelope:
//!
//! ```json
//! { "success": false, "error": { "code": "...", "message": "...", "details": {...} } }
//! ```
//!
//! Domain errors (validation, not-found, conflict, auth, rate limit) map to
//! their specific codes; anything unanticipated falls through to
//! `INTERNAL_ERROR` with a generic client message and a full server-side log.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to one HTTP status and one machine-readable error code.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (connection error, query error).
    ///
    /// Clients see a generic message; the underlying error is logged.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request data is malformed or out of range.
    ///
    /// Returns HTTP 400 with code `VALIDATION_ERROR`; when the offending
    /// field is known it is named in `details.field`.
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<&'static str>,
    },

    /// No resolvable session credential was presented.
    ///
    /// Returns HTTP 401 with code `UNAUTHORIZED`.
    #[error("Authentication required")]
    Unauthorized,

    /// A valid session exists but belongs to someone other than the owner.
    ///
    /// Returns HTTP 403 with code `FORBIDDEN`.
    #[error("Access denied")]
    Forbidden,

    /// The referenced resource does not exist.
    ///
    /// Returns HTTP 404 with code `NOT_FOUND`.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The operation violates a data guard (e.g. deleting a category that
    /// still has transactions, or a duplicate name+kind pair).
    ///
    /// Returns HTTP 409 with code `CONFLICT`.
    #[error("{0}")]
    Conflict(String),

    /// The client exhausted its fixed-window request budget.
    ///
    /// Returns HTTP 429 with code `RATE_LIMITED` and the window reset time
    /// (Unix seconds) in the details.
    #[error("Too many requests")]
    RateLimited { reset_at: i64 },
}

impl AppError {
    /// Validation failure attributed to one request field.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message, details)
        let (status, code, message, details) = match self {
            AppError::Validation { ref message, field } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                message.clone(),
                field.map(|field| json!({ "field": field })),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                self.to_string(),
                None,
            ),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", self.to_string(), None),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string(), None),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone(), None),
            AppError::RateLimited { reset_at } => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                self.to_string(),
                Some(json!({ "resetAt": reset_at })),
            ),
            AppError::Database(ref err) => {
                // Full detail stays on the server; the client only learns
                // that something internal failed.
                tracing::error!(error = %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message,
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        let body = Json(json!({
            "success": false,
            "error": error,
        }));

        (status, body).into_response()
    }
}

/// Postgres error code for foreign-key violations.
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
/// Postgres error code for unique-constraint violations.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// True when the database rejected the statement for a missing foreign row.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(
        err.as_database_error().and_then(|db| db.code()),
        Some(code) if code == PG_FOREIGN_KEY_VIOLATION
    )
}

/// True when the database rejected the statement for a duplicate key.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err.as_database_error().and_then(|db| db.code()),
        Some(code) if code == PG_UNIQUE_VIOLATION
    )
}
