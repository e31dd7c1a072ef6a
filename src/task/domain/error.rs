//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is not a string of decimal digits.
    #[error("invalid task id '{0}', expected a non-negative integer")]
    InvalidTaskId(String),

    /// The task title is shorter than the accepted minimum.
    #[error("title must be at least {min} characters, got {actual}")]
    TitleTooShort {
        /// Minimum accepted length.
        min: usize,
        /// Length of the rejected title.
        actual: usize,
    },

    /// The task title is longer than the accepted maximum.
    #[error("title must not exceed {max} characters, got {actual}")]
    TitleTooLong {
        /// Maximum accepted length.
        max: usize,
        /// Length of the rejected title.
        actual: usize,
    },

    /// The task description is longer than the accepted maximum.
    #[error("description must not exceed {max} characters, got {actual}")]
    DescriptionTooLong {
        /// Maximum accepted length.
        max: usize,
        /// Length of the rejected description.
        actual: usize,
    },

    /// The requested status transition is not permitted.
    #[error("task {task_id} cannot transition from {from} to {to}")]
    InvalidStateTransition {
        /// Task whose transition was rejected.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// An agent process is already recorded as running for the task.
    #[error("task {0} is already running")]
    ExecutionInFlight(TaskId),
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
