//! JSON request and response bodies.

use crate::task::{
    domain::{RunnerPid, Task, TaskStatus},
    services::{StartedExecution, TaskLogs},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskBody {
    /// Task title; a missing title is rejected by validation.
    #[serde(default)]
    pub title: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Task as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    /// Task identifier.
    pub id: i64,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Execution status.
    pub status: TaskStatus,
    /// Process identifier of the most recent launch.
    pub runner_pid: Option<u32>,
    /// Output captured by the most recent finished attempt.
    pub output: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().value(),
            title: task.title().as_str().to_owned(),
            description: task.description().as_str().to_owned(),
            status: task.status(),
            runner_pid: task.runner_pid().map(RunnerPid::value),
            output: task.output().map(str::to_owned),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Body returned by `POST /tasks/{id}/run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStartedView {
    /// Human-readable confirmation.
    pub message: String,
    /// Pid of the launched runner, `null` when it failed to start.
    pub runner_pid: Option<u32>,
    /// Task the execution belongs to.
    pub task_id: i64,
}

impl From<&StartedExecution> for ExecutionStartedView {
    fn from(started: &StartedExecution) -> Self {
        Self {
            message: "Task execution started".to_owned(),
            runner_pid: started.runner_pid().map(RunnerPid::value),
            task_id: started.task_id().value(),
        }
    }
}

/// Body returned by `GET /tasks/{id}/logs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskLogsView {
    /// Captured output split into lines.
    pub logs: Vec<String>,
    /// Execution status.
    pub status: TaskStatus,
    /// Process identifier of the most recent launch.
    pub runner_pid: Option<u32>,
}

impl From<TaskLogs> for TaskLogsView {
    fn from(logs: TaskLogs) -> Self {
        Self {
            logs: logs.lines,
            status: logs.status,
            runner_pid: logs.runner_pid.map(RunnerPid::value),
        }
    }
}
