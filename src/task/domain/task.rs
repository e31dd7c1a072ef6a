//! Task aggregate root and related execution lifecycle types.

use super::{ParseTaskStatusError, RunnerPid, TaskDescription, TaskDomainError, TaskId, TaskTitle};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task execution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been created and never executed.
    Pending,
    /// An agent process has been launched and has not reported back.
    Running,
    /// The most recent agent process exited successfully.
    Done,
    /// The most recent agent process failed to start or exited unsuccessfully.
    Error,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Done => "done",
            Self::Error => "error",
        }
    }

    /// Returns whether the status ends an execution attempt.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }

    /// Returns whether moving from `self` to `target` is permitted.
    ///
    /// `pending` is never re-entered, and a terminal status may start a new
    /// attempt by moving back to `running`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending | Self::Done | Self::Error, Self::Running)
                | (Self::Running, Self::Done | Self::Error)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, ParseTaskStatusError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "done" => Ok(Self::Done),
            "error" => Ok(Self::Error),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// A task that has not yet been assigned an identifier by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    title: TaskTitle,
    description: TaskDescription,
    created_at: DateTime<Utc>,
}

impl NewTask {
    /// Creates a pending task draft stamped with the current clock time.
    #[must_use]
    pub fn new(title: TaskTitle, description: TaskDescription, clock: &impl Clock) -> Self {
        Self {
            title,
            description,
            created_at: clock.utc(),
        }
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Materializes the draft as a pending task with a store-assigned id.
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            status: TaskStatus::Pending,
            runner_pid: None,
            output: None,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: TaskDescription,
    status: TaskStatus,
    runner_pid: Option<RunnerPid>,
    output: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: TaskDescription,
    /// Persisted execution status.
    pub status: TaskStatus,
    /// Process identifier of the most recent launch, if any.
    pub runner_pid: Option<RunnerPid>,
    /// Output captured by the most recent finished attempt, if any.
    pub output: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            runner_pid: data.runner_pid,
            output: data.output,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the execution status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the process identifier of the most recent launch.
    #[must_use]
    pub const fn runner_pid(&self) -> Option<RunnerPid> {
        self.runner_pid
    }

    /// Returns the captured output of the most recent finished attempt.
    #[must_use]
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether an agent process is recorded as in flight.
    ///
    /// Both the status and a recorded pid are required; a `running` task
    /// without a pid is a stale record left behind by an interrupted launch.
    #[must_use]
    pub const fn has_execution_in_flight(&self) -> bool {
        matches!(self.status, TaskStatus::Running) && self.runner_pid.is_some()
    }

    /// Returns the captured output split into lines.
    ///
    /// Returns an empty list when no output has been captured.
    #[must_use]
    pub fn log_lines(&self) -> Vec<String> {
        self.output
            .as_deref()
            .map(|output| output.lines().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    /// Moves the task into `running` ahead of a process launch.
    ///
    /// A stale `running` record without a pid may be re-entered. The previous
    /// pid and output are retained until the new attempt replaces them.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ExecutionInFlight`] when a process is
    /// already recorded for the task.
    pub fn begin_execution(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.has_execution_in_flight() {
            return Err(TaskDomainError::ExecutionInFlight(self.id));
        }
        if self.status == TaskStatus::Running {
            self.touch(clock);
            return Ok(());
        }
        self.transition_to(TaskStatus::Running, clock)
    }

    /// Records the process identifier of a freshly launched agent.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when the task is
    /// not `running`.
    pub fn record_launch(
        &mut self,
        pid: RunnerPid,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if self.status != TaskStatus::Running {
            return Err(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.status,
                to: TaskStatus::Running,
            });
        }
        self.runner_pid = Some(pid);
        self.touch(clock);
        Ok(())
    }

    /// Finishes the running attempt with the process exit code and output.
    ///
    /// An exit code of zero yields `done`; any other code, or termination
    /// without a code, yields `error`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when the task is
    /// not `running`.
    pub fn complete_execution(
        &mut self,
        exit_code: Option<i32>,
        output: String,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let status = if exit_code == Some(0) {
            TaskStatus::Done
        } else {
            TaskStatus::Error
        };
        self.transition_to(status, clock)?;
        self.output = Some(output);
        Ok(())
    }

    /// Finishes the running attempt after the agent process failed to start.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when the task is
    /// not `running`.
    pub fn fail_launch(
        &mut self,
        reason: &str,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.transition_to(TaskStatus::Error, clock)?;
        self.output = Some(format!("Failed to start agent runner: {reason}"));
        Ok(())
    }

    /// Transitions the task to `target` if the state machine permits it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when the move is
    /// not permitted.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
