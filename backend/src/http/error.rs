//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::services::generation::GenerationError;
use crate::services::slot_grid::GridError;
use crate::services::validation::{describe, FieldViolation};

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Upstream solver status for failed generations
    #[serde(rename = "upstreamStatus", skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            upstream_status: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn with_upstream_status(mut self, status: Option<u16>) -> Self {
        self.upstream_status = status;
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request, with the offending fields
    Validation(String, Option<String>),
    /// Settings cannot produce a grid
    Configuration(String),
    /// Solver produced no usable result
    GenerationFailed {
        status: Option<u16>,
        message: String,
    },
    /// Generation cancelled before commit
    Cancelled(String),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
}

impl AppError {
    pub fn validation(violations: &[FieldViolation]) -> Self {
        AppError::Validation(
            format!("{} invalid field(s)", violations.len()),
            Some(describe(violations)),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::Validation(msg, details) => {
                let mut error = ApiError::new("VALIDATION_ERROR", msg);
                error.details = details;
                (StatusCode::BAD_REQUEST, error)
            }
            AppError::Configuration(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("CONFIGURATION_ERROR", msg),
            ),
            AppError::GenerationFailed { status, message } => (
                StatusCode::BAD_GATEWAY,
                ApiError::new("GENERATION_FAILED", "Timetable generation failed")
                    .with_details(message)
                    .with_upstream_status(status),
            ),
            AppError::Cancelled(msg) => (
                StatusCode::CONFLICT,
                ApiError::new("GENERATION_CANCELLED", msg),
            ),
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("INTERNAL_ERROR", msg),
                )
            }
            AppError::Repository(e) => repository_response(e),
        };

        (status, Json(error)).into_response()
    }
}

fn repository_response(err: RepositoryError) -> (StatusCode, ApiError) {
    let details = err.context().details.clone();
    let message = err.message().to_string();
    let (status, code) = match &err {
        RepositoryError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        RepositoryError::ValidationError { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        RepositoryError::ConfigurationError { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "CONFIGURATION_ERROR")
        }
        RepositoryError::ConnectionError { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "REPOSITORY_UNAVAILABLE")
        }
        RepositoryError::StorageError { .. } | RepositoryError::InternalError { .. } => {
            error!("Repository failure: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "REPOSITORY_ERROR")
        }
    };
    let mut error = ApiError::new(code, message);
    error.details = details;
    (status, error)
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<GridError> for AppError {
    fn from(err: GridError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Validation(violations) => AppError::validation(&violations),
            GenerationError::Configuration(grid) => grid.into(),
            GenerationError::Failed { status, message } => {
                AppError::GenerationFailed { status, message }
            }
            GenerationError::Cancelled => {
                AppError::Cancelled("Generation was cancelled; its result was discarded".into())
            }
            GenerationError::Repository(e) => e.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
