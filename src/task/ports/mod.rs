//! Port contracts for task tracking and execution.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod repository;
pub mod supervisor;

pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use supervisor::{
    ProcessHandle, ProcessOutcome, ProcessRequest, ProcessSupervisor, ProcessSupervisorError,
};
