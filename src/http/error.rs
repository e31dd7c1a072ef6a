//! Error envelope returned by the HTTP API.

use crate::task::{
    domain::TaskDomainError,
    ports::TaskRepositoryError,
    services::{TaskCatalogError, TaskExecutionError},
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::error;

/// Machine-readable error codes.
pub mod codes {
    /// Missing or wrong API key.
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    /// The referenced resource does not exist.
    pub const NOT_FOUND: &str = "NOT_FOUND";
    /// Input failed validation.
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    /// The request cannot be served as given.
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    /// The request conflicts with the current resource state.
    pub const CONFLICT: &str = "CONFLICT";
    /// Unexpected server-side failure.
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Error response with status code and JSON envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<Vec<String>>,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorBody<'a>,
    timestamp: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [String]>,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Missing or invalid API key.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            codes::UNAUTHORIZED,
            "Invalid or missing API key",
        )
    }

    /// A resource with the given identifier does not exist.
    #[must_use]
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            codes::NOT_FOUND,
            format!("{resource} with id '{id}' not found"),
        )
    }

    /// Input failed validation; each detail names a field and the reason.
    #[must_use]
    pub fn validation(details: Vec<String>) -> Self {
        Self {
            details: Some(details),
            ..Self::new(
                StatusCode::BAD_REQUEST,
                codes::VALIDATION_ERROR,
                "Validation failed",
            )
        }
    }

    /// The request cannot be served as given.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message)
    }

    /// The request conflicts with the current resource state.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, codes::CONFLICT, message)
    }

    /// Unexpected failure; the cause is logged and not exposed.
    #[must_use]
    pub fn internal(cause: &dyn std::error::Error) -> Self {
        error!(error = %cause, "request failed");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL_ERROR,
            "Internal server error",
        )
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let envelope = ErrorEnvelope {
            error: ErrorBody {
                code: self.code,
                message: &self.message,
                details: self.details.as_deref(),
            },
            timestamp: Utc::now().to_rfc3339(),
        };
        (self.status, Json(envelope)).into_response()
    }
}

impl From<TaskDomainError> for ApiError {
    fn from(err: TaskDomainError) -> Self {
        match err {
            TaskDomainError::InvalidTaskId(_) => {
                Self::validation(vec!["id: ID must be a valid number".to_owned()])
            }
            other => Self::bad_request(other.to_string()),
        }
    }
}

impl From<TaskCatalogError> for ApiError {
    fn from(err: TaskCatalogError) -> Self {
        match err {
            TaskCatalogError::Validation(violations) => {
                Self::validation(violations.iter().map(ToString::to_string).collect())
            }
            TaskCatalogError::NotFound(id) => Self::not_found("Task", id),
            TaskCatalogError::Repository(err) => Self::from(err),
        }
    }
}

impl From<TaskExecutionError> for ApiError {
    fn from(err: TaskExecutionError) -> Self {
        match err {
            TaskExecutionError::NotFound(id) => Self::not_found("Task", id),
            TaskExecutionError::AlreadyRunning(_) => Self::conflict("Task is already running"),
            TaskExecutionError::MissingRepositoryUrl(_) => Self::bad_request(
                "Task description must include a GitHub repo URL (https://github.com/...)",
            ),
            TaskExecutionError::Repository(err) => Self::from(err),
            other @ (TaskExecutionError::Domain(_)
            | TaskExecutionError::ReconciliationAborted(_)) => Self::internal(&other),
        }
    }
}

impl From<TaskRepositoryError> for ApiError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::not_found("Task", id),
            TaskRepositoryError::Persistence(_) => Self::internal(&err),
        }
    }
}
