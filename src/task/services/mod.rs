//! Application services for task tracking and execution orchestration.

mod catalog;
mod execution;
mod runner;

pub use catalog::{
    CreateTaskRequest, FieldViolation, TaskCatalogError, TaskCatalogResult, TaskCatalogService,
    TaskLogs,
};
pub use execution::{
    StartedExecution, TaskExecutionError, TaskExecutionResult, TaskExecutionService,
};
pub use runner::{GITHUB_TOKEN_ENV, RunnerSettings};
