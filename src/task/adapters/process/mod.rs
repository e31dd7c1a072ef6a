//! Child-process adapters for agent runner supervision.

mod output;
mod supervisor;

pub use output::OutputBuffer;
pub use supervisor::TokioProcessSupervisor;
