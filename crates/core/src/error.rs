//! Structured error handling for the admin HTTP surface.
//!
//! Every handler returns `AppError`, which converts into an HTTP response
//! with a JSON body. Internal details are logged but never exposed to clients.

use std::fmt::Display;

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::validation::ValidationErrors;

/// Application error type with automatic HTTP response conversion.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("The given data was invalid")]
    Validation(#[from] ValidationErrors),

    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Internal: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a not found error for an entity.
    pub fn not_found(entity: &str, id: impl Display) -> Self {
        Self::NotFound(format!("{entity} not found: {id}"))
    }

    /// Create a permission error for a missing named permission.
    #[must_use]
    pub fn missing_permission(permission: &str) -> Self {
        Self::PermissionDenied(format!("Missing permission: {permission}"))
    }

    /// HTTP status code this error is reported with.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Self::Validation(errors) => json!({
                "message": "The given data was invalid",
                "errors": errors,
            }),
            Self::Internal(msg) => {
                error!(error = %msg, "Internal error");
                json!({ "error": "Internal server error" })
            }
            Self::Unavailable(msg) => {
                error!(error = %msg, "Dependency unavailable");
                json!({ "error": "Service unavailable" })
            }
            Self::NotFound(msg)
            | Self::Unauthenticated(msg)
            | Self::PermissionDenied(msg)
            | Self::InvalidArgument(msg) => json!({ "error": msg }),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for the application.
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for converting foreign errors into `AppError::Internal` with logging.
pub trait ResultExt<T> {
    /// Convert error to `AppError::Internal`, logging the source.
    ///
    /// # Errors
    /// Returns `AppError::Internal` carrying the provided message.
    fn internal(self, msg: &'static str) -> AppResult<T>;
}

impl<T, E: Display> ResultExt<T> for Result<T, E> {
    fn internal(self, msg: &'static str) -> AppResult<T> {
        self.map_err(|e| {
            error!(error = %e, "{msg}");
            AppError::Internal(msg.to_string())
        })
    }
}
