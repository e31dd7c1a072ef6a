//! Tasklane: task tracking with agent runner execution.
//!
//! Tasks are created through an authenticated HTTP API and can be executed
//! by launching an external agent runner against the GitHub repository named
//! in the task description. The launch returns immediately; the runner's
//! exit status and output are written back to the task when it finishes.
//!
//! # Architecture
//!
//! Tasklane follows hexagonal architecture principles:
//!
//! - **Domain**: task records, the status machine and repository URL
//!   extraction, free of infrastructure dependencies
//! - **Ports**: trait interfaces for persistence and process supervision
//! - **Adapters**: `PostgreSQL`, in-memory and Tokio process implementations
//!
//! # Modules
//!
//! - [`task`]: task lifecycle, execution orchestration and adapters
//! - [`http`]: the axum router and JSON contract
//! - [`config`]: command-line and environment configuration

pub mod config;
pub mod http;
pub mod task;
