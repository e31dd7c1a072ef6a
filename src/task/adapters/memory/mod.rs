//! In-memory adapters for tests and database-less deployments.

mod supervisor;
mod task;

pub use supervisor::ScriptedProcessSupervisor;
pub use task::InMemoryTaskRepository;
