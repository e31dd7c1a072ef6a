//! HTTP surface of the task API.
//!
//! | Route                     | Handler                  |
//! |---------------------------|--------------------------|
//! | `GET /health`             | [`routes::health`]       |
//! | `POST /tasks`             | [`routes::create_task`]  |
//! | `GET /tasks`              | [`routes::list_tasks`]   |
//! | `GET /tasks/{id}`         | [`routes::get_task`]     |
//! | `POST /tasks/{id}/run`    | [`routes::run_task`]     |
//! | `GET /tasks/{id}/logs`    | [`routes::task_logs`]    |
//!
//! Every `/tasks` route requires the `x-api-key` header.

pub mod auth;
pub mod dto;
mod error;
pub mod routes;

pub use error::{ApiError, codes};

use crate::task::{
    ports::{ProcessSupervisor, TaskRepository},
    services::{RunnerSettings, TaskCatalogService, TaskExecutionService},
};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use mockable::DefaultClock;
use std::sync::Arc;

/// Catalog service as wired into the HTTP layer.
pub type CatalogService = TaskCatalogService<dyn TaskRepository, DefaultClock>;

/// Execution service as wired into the HTTP layer.
pub type ExecutionService =
    TaskExecutionService<dyn TaskRepository, dyn ProcessSupervisor, DefaultClock>;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    catalog: CatalogService,
    execution: ExecutionService,
    api_key: Arc<str>,
}

impl AppState {
    /// Wires the services over a repository and a process supervisor.
    #[must_use]
    pub fn new(
        repository: Arc<dyn TaskRepository>,
        supervisor: Arc<dyn ProcessSupervisor>,
        runner: RunnerSettings,
        api_key: impl Into<Arc<str>>,
    ) -> Self {
        let clock = Arc::new(DefaultClock);
        Self {
            catalog: TaskCatalogService::new(Arc::clone(&repository), Arc::clone(&clock)),
            execution: TaskExecutionService::new(repository, supervisor, clock, runner),
            api_key: api_key.into(),
        }
    }

    /// Returns the catalog service.
    #[must_use]
    pub const fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    /// Returns the execution service.
    #[must_use]
    pub const fn execution(&self) -> &ExecutionService {
        &self.execution
    }

    /// Returns the expected API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

/// Builds the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    let tasks = Router::new()
        .route("/tasks", post(routes::create_task).get(routes::list_tasks))
        .route("/tasks/{id}", get(routes::get_task))
        .route("/tasks/{id}/run", post(routes::run_task))
        .route("/tasks/{id}/logs", get(routes::task_logs))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .route("/health", get(routes::health))
        .merge(tasks)
        .with_state(state)
}
