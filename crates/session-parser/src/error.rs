//! Error types for the session parser

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::processing::JobStatus;

/// Result type alias for session parser operations
pub type Result<T> = std::result::Result<T, Error>;

/// Session parser errors
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing input at submission time
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown job id
    #[error("Task not found: {0}")]
    JobNotFound(Uuid),

    /// Result requested before the job reached `completed`
    #[error("Task {id} is not completed yet (status: {status})")]
    JobNotCompleted { id: Uuid, status: JobStatus },

    /// Job ended in `failed`; carries the captured error text
    #[error("Task {id} processing failed: {details}")]
    JobFailed { id: Uuid, details: String },

    /// Workbook bytes could not be opened
    #[error("Failed to read workbook: {0}")]
    Workbook(String),

    /// A worksheet could not be read or parsed
    #[error("Failed to parse sheet '{sheet}': {message}")]
    SheetParse { sheet: String, message: String },

    /// Reading or writing job files failed
    #[error("Storage error at '{path}': {message}")]
    Persistence { path: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a sheet parse error
    pub fn sheet_parse(sheet: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SheetParse {
            sheet: sheet.into(),
            message: message.into(),
        }
    }

    /// Create a persistence error for a path
    pub fn persistence(path: impl AsRef<std::path::Path>, message: impl ToString) -> Self {
        Self::Persistence {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = match &self {
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            Error::JobNotFound(_) => (StatusCode::NOT_FOUND, json!({ "error": "Task not found" })),
            Error::JobNotCompleted { status, .. } => (
                StatusCode::CONFLICT,
                json!({ "error": "Task is not completed yet", "status": status }),
            ),
            Error::JobFailed { details, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": "Task processing failed", "details": details }),
            ),
            Error::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Configuration error", "details": msg }),
            ),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal error", "details": other.to_string() }),
            ),
        };

        let (status, value) = body;
        (status, Json(value)).into_response()
    }
}
