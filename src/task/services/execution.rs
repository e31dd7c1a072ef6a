//! Execution orchestration: launching agent runners and reconciling their
//! outcome onto task records.

use super::RunnerSettings;
use crate::task::{
    domain::{RunnerPid, Task, TaskDomainError, TaskId, extract_repository_url},
    ports::{
        ProcessHandle, ProcessOutcome, ProcessSupervisor, TaskRepository, TaskRepositoryError,
    },
};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Service-level errors for task execution.
#[derive(Debug, Error)]
pub enum TaskExecutionError {
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// An execution is already in flight for the task.
    #[error("task {0} is already running")]
    AlreadyRunning(TaskId),
    /// The task description does not reference a GitHub repository.
    #[error(
        "task {0} description must include a GitHub repository URL (https://github.com/...)"
    )]
    MissingRepositoryUrl(TaskId),
    /// Domain state machine rejected an update.
    #[error(transparent)]
    Domain(TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The background reconciliation task stopped before finishing.
    #[error("execution reconciliation aborted: {0}")]
    ReconciliationAborted(String),
}

impl From<TaskDomainError> for TaskExecutionError {
    fn from(err: TaskDomainError) -> Self {
        match err {
            TaskDomainError::ExecutionInFlight(id) => Self::AlreadyRunning(id),
            other => Self::Domain(other),
        }
    }
}

/// Result type for task execution operations.
pub type TaskExecutionResult<T> = Result<T, TaskExecutionError>;

/// A launched execution attempt.
///
/// Dropping the value detaches the background reconciliation; the final
/// status is still written when the process finishes.
#[derive(Debug)]
pub struct StartedExecution {
    task_id: TaskId,
    runner_pid: Option<RunnerPid>,
    reconciliation: JoinHandle<TaskExecutionResult<Task>>,
}

impl StartedExecution {
    /// Returns the task the attempt belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the pid of the launched process, or `None` when the launch
    /// failed before a process existed.
    #[must_use]
    pub const fn runner_pid(&self) -> Option<RunnerPid> {
        self.runner_pid
    }

    /// Waits until the attempt's final status has been persisted.
    ///
    /// # Errors
    ///
    /// Returns the error raised while recording the outcome, or
    /// [`TaskExecutionError::ReconciliationAborted`] when the background task
    /// panicked or was cancelled.
    pub async fn wait_for_completion(self) -> TaskExecutionResult<Task> {
        self.reconciliation
            .await
            .map_err(|err| TaskExecutionError::ReconciliationAborted(err.to_string()))?
    }
}

/// Task ids whose launch is between persisting `running` and persisting the
/// pid.
#[derive(Debug, Clone, Default)]
struct LaunchRegistry {
    active: Arc<Mutex<HashSet<TaskId>>>,
}

impl LaunchRegistry {
    fn claim(&self, id: TaskId) -> Option<LaunchClaim> {
        let inserted = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id);
        inserted.then(|| LaunchClaim {
            active: Arc::clone(&self.active),
            id,
        })
    }
}

#[derive(Debug)]
struct LaunchClaim {
    active: Arc<Mutex<HashSet<TaskId>>>,
    id: TaskId,
}

impl Drop for LaunchClaim {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

/// Drives execution attempts through the task status machine.
///
/// Launch requests return as soon as the process has been started and its
/// pid persisted. Completion is observed in the background and written back
/// to the task.
pub struct TaskExecutionService<R, S, C>
where
    R: TaskRepository + ?Sized + 'static,
    S: ProcessSupervisor + ?Sized,
    C: Clock + Send + Sync + 'static,
{
    repository: Arc<R>,
    supervisor: Arc<S>,
    clock: Arc<C>,
    runner: Arc<RunnerSettings>,
    launches: LaunchRegistry,
}

impl<R, S, C> Clone for TaskExecutionService<R, S, C>
where
    R: TaskRepository + ?Sized + 'static,
    S: ProcessSupervisor + ?Sized,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            supervisor: Arc::clone(&self.supervisor),
            clock: Arc::clone(&self.clock),
            runner: Arc::clone(&self.runner),
            launches: self.launches.clone(),
        }
    }
}

impl<R, S, C> TaskExecutionService<R, S, C>
where
    R: TaskRepository + ?Sized + 'static,
    S: ProcessSupervisor + ?Sized,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new execution service.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        supervisor: Arc<S>,
        clock: Arc<C>,
        runner: RunnerSettings,
    ) -> Self {
        Self {
            repository,
            supervisor,
            clock,
            runner: Arc::new(runner),
            launches: LaunchRegistry::default(),
        }
    }

    /// Starts an execution attempt for task `id`.
    ///
    /// Preconditions are checked before anything is written: the task must
    /// exist, must not have a process in flight, and its description must
    /// contain a GitHub repository URL. The task is then persisted as
    /// `running`, the runner is launched and its pid persisted. The outcome
    /// of the process is recorded asynchronously; a failure to start shows up
    /// only as a later `error` status.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`TaskExecutionError::NotFound`],
    /// [`TaskExecutionError::AlreadyRunning`] or
    /// [`TaskExecutionError::MissingRepositoryUrl`] without mutating the task,
    /// and [`TaskExecutionError::Repository`] when persistence fails.
    pub async fn start_execution(&self, id: TaskId) -> TaskExecutionResult<StartedExecution> {
        let _claim = self
            .launches
            .claim(id)
            .ok_or(TaskExecutionError::AlreadyRunning(id))?;

        let mut task = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(TaskExecutionError::NotFound(id))?;
        if task.has_execution_in_flight() {
            return Err(TaskExecutionError::AlreadyRunning(id));
        }
        let repository_url = extract_repository_url(task.description().as_str())
            .ok_or(TaskExecutionError::MissingRepositoryUrl(id))?;

        task.begin_execution(&*self.clock)?;
        self.repository.update(&task).await?;

        info!(
            task_id = %id,
            repository = %repository_url,
            program = self.runner.program(),
            has_github_token = self.runner.has_github_token(),
            "launching agent runner"
        );
        let handle = self
            .supervisor
            .launch(self.runner.build_request(&task, &repository_url));
        let runner_pid = handle.pid();
        let pid_recorded = self.record_pid(&mut task, runner_pid).await;

        let reconciliation = tokio::spawn(reconcile_in_background(
            Arc::clone(&self.repository),
            Arc::clone(&self.clock),
            id,
            handle,
        ));
        pid_recorded?;

        Ok(StartedExecution {
            task_id: id,
            runner_pid,
            reconciliation,
        })
    }

    async fn record_pid(
        &self,
        task: &mut Task,
        runner_pid: Option<RunnerPid>,
    ) -> TaskExecutionResult<()> {
        let Some(pid) = runner_pid else {
            return Ok(());
        };
        task.record_launch(pid, &*self.clock)?;
        self.repository.update(task).await?;
        Ok(())
    }
}

async fn reconcile_in_background<R, C>(
    repository: Arc<R>,
    clock: Arc<C>,
    id: TaskId,
    handle: ProcessHandle,
) -> TaskExecutionResult<Task>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
{
    let outcome = handle.wait().await.unwrap_or_else(|err| {
        warn!(task_id = %id, error = %err, "agent outcome lost");
        ProcessOutcome::Exited {
            exit_code: None,
            output: err.to_string(),
        }
    });

    let result = record_outcome(&*repository, &*clock, id, &outcome).await;
    match &result {
        Ok(task) => info!(task_id = %id, status = %task.status(), "agent execution finished"),
        Err(err) => error!(task_id = %id, error = %err, "failed to record agent outcome"),
    }
    result
}

async fn record_outcome<R, C>(
    repository: &R,
    clock: &C,
    id: TaskId,
    outcome: &ProcessOutcome,
) -> TaskExecutionResult<Task>
where
    R: TaskRepository + ?Sized,
    C: Clock,
{
    let mut task = repository
        .find_by_id(id)
        .await?
        .ok_or(TaskExecutionError::NotFound(id))?;
    match outcome {
        ProcessOutcome::Exited { exit_code, output } => {
            task.complete_execution(*exit_code, output.clone(), clock)?;
        }
        ProcessOutcome::FailedToStart { reason } => {
            task.fail_launch(reason, clock)?;
        }
    }
    repository.update(&task).await?;
    Ok(task)
}
