//! Domain model for task tracking and agent execution.
//!
//! The task domain models task records, their execution status machine and
//! the extraction of repository references from descriptions, while keeping
//! storage and process concerns outside of the domain boundary.

mod error;
mod ids;
mod repository_url;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{RunnerPid, TaskDescription, TaskId, TaskTitle};
pub use repository_url::{RepositoryUrl, extract_repository_url};
pub use task::{NewTask, PersistedTaskData, Task, TaskStatus};
