//! Service layer for task creation, lookup and log retrieval.

use crate::task::{
    domain::{
        NewTask, RunnerPid, Task, TaskDescription, TaskDomainError, TaskId, TaskStatus, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A rejected input field together with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Name of the offending field.
    pub field: &'static str,
    /// Validation failure for the field.
    pub error: TaskDomainError,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.error)
    }
}

/// Captured output of a task, split into lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLogs {
    /// Output lines; empty when nothing has been captured.
    pub lines: Vec<String>,
    /// Current execution status.
    pub status: TaskStatus,
    /// Process identifier of the most recent launch.
    pub runner_pid: Option<RunnerPid>,
}

/// Service-level errors for task catalog operations.
#[derive(Debug, Error)]
pub enum TaskCatalogError {
    /// One or more input fields failed validation.
    #[error("invalid task input")]
    Validation(Vec<FieldViolation>),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task catalog operations.
pub type TaskCatalogResult<T> = Result<T, TaskCatalogError>;

/// Task creation and lookup service.
pub struct TaskCatalogService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for TaskCatalogService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> TaskCatalogService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new catalog service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Validates and stores a new pending task.
    ///
    /// Every invalid field is reported, not just the first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCatalogError::Validation`] when the title or description
    /// is rejected, or [`TaskCatalogError::Repository`] when persistence
    /// fails.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskCatalogResult<Task> {
        let title = TaskTitle::new(request.title);
        let description = TaskDescription::new(request.description.unwrap_or_default());

        let (title, description) = match (title, description) {
            (Ok(title), Ok(description)) => (title, description),
            (title, description) => {
                let violations = [("title", title.err()), ("description", description.err())]
                    .into_iter()
                    .filter_map(|(field, error)| error.map(|error| FieldViolation { field, error }))
                    .collect();
                return Err(TaskCatalogError::Validation(violations));
            }
        };

        let draft = NewTask::new(title, description, &*self.clock);
        Ok(self.repository.create(&draft).await?)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCatalogError::NotFound`] when the task does not exist.
    pub async fn get_task(&self, id: TaskId) -> TaskCatalogResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskCatalogError::NotFound(id))
    }

    /// Lists all tasks ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCatalogError::Repository`] when the lookup fails.
    pub async fn list_tasks(&self) -> TaskCatalogResult<Vec<Task>> {
        Ok(self.repository.list().await?)
    }

    /// Returns the captured output of a task split into lines.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCatalogError::NotFound`] when the task does not exist.
    pub async fn task_logs(&self, id: TaskId) -> TaskCatalogResult<TaskLogs> {
        let task = self.get_task(id).await?;
        Ok(TaskLogs {
            lines: task.log_lines(),
            status: task.status(),
            runner_pid: task.runner_pid(),
        })
    }
}
