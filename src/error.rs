//! API error type shared by the HTTP handlers.
//!
//! Handlers return `Result<_, ApiError>`; each variant maps to a status
//! code and a JSON body of the form `{"error": "..."}` so the SPA can
//! surface failures uniformly.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::assistant::AssistantError;
use crate::db::DbLockError;
use crate::domain::ValidationIssue;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    /// Rejected quiz or exercise definition, with the field-level issues
    #[error("invalid definition")]
    Invalid(Vec<ValidationIssue>),

    #[error("{0}")]
    Forbidden(String),

    /// Completion refused while practical exercises still lack submissions
    #[error("lesson has outstanding practical exercises")]
    CompletionBlocked { outstanding: Vec<usize> },

    #[error("assistant is not configured")]
    AssistantDisabled,

    #[error("assistant request failed: {0}")]
    Assistant(#[from] AssistantError),

    #[error("database unavailable")]
    Unavailable,

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
}

impl From<DbLockError> for ApiError {
    fn from(_: DbLockError) -> Self {
        ApiError::Unavailable
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Db(e) = &self {
            tracing::error!("Database error: {}", e);
        }

        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::CompletionBlocked { .. } => StatusCode::CONFLICT,
            ApiError::AssistantDisabled | ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Assistant(_) => StatusCode::BAD_GATEWAY,
            ApiError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            ApiError::Invalid(issues) => json!({
                "error": self.to_string(),
                "issues": issues,
            }),
            ApiError::CompletionBlocked { outstanding } => json!({
                "error": self.to_string(),
                "outstanding_exercises": outstanding,
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
