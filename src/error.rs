use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::repository::RepoError;

/// AppError
///
/// Every failure a handler or the auth gate can produce. Each variant maps to
/// exactly one status code; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No session cookie, or the cookie names no live session.
    #[error("authentication required")]
    Unauthorized,

    /// A session exists but the admin it names is gone or does not match,
    /// or the login credentials were wrong.
    #[error("access denied")]
    Forbidden,

    /// Malformed body/query, or answers that fail validation.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate value for a unique field.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Repository(#[from] RepoError),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Repository(RepoError::Conflict(_)) => StatusCode::CONFLICT,
            AppError::Repository(RepoError::MissingReference(_)) => StatusCode::NOT_FOUND,
            AppError::Repository(RepoError::Database(_)) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self.status() {
            StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
            StatusCode::FORBIDDEN => "FORBIDDEN",
            StatusCode::BAD_REQUEST => "BAD_REQUEST",
            StatusCode::NOT_FOUND => "NOT_FOUND",
            StatusCode::CONFLICT => "CONFLICT",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            // Driver messages can leak schema details; log them, send a generic text.
            tracing::error!(error = %self, "request failed");
            "An internal error occurred".to_string()
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
            self.to_string()
        };

        let body = json!({
            "error": message,
            "code": self.code(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
