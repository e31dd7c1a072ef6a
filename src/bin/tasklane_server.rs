//! Serves the task API.
//!
//! Configuration is read from flags and the environment (see
//! [`tasklane::config::ServiceConfig`]); a `.env` file in the working
//! directory is loaded first. Tasks are kept in `PostgreSQL` when
//! `DATABASE_URL` is set and in memory otherwise.

use clap::Parser;
use std::sync::Arc;
use tasklane::config::ServiceConfig;
use tasklane::http::{AppState, router};
use tasklane::task::adapters::memory::InMemoryTaskRepository;
use tasklane::task::adapters::postgres::{PostgresTaskRepository, build_task_pool};
use tasklane::task::adapters::process::TokioProcessSupervisor;
use tasklane::task::ports::TaskRepository;
use tokio::net::TcpListener;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> Result<(), BoxError> {
    // A missing .env file is not an error.
    let _env_file = dotenvy::dotenv().ok();
    let config = ServiceConfig::parse();
    init_tracing(&config.log_level);

    let runner = config.runner_settings()?;
    let repository = build_repository(&config)?;
    let supervisor = Arc::new(TokioProcessSupervisor::new(config.max_output_bytes));
    if config.uses_default_api_key() {
        warn!("API_KEY is not set; the built-in default key is accepted");
    }
    let state = AppState::new(repository, supervisor, runner, config.api_key.as_str());

    let runtime = Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(async move {
        let listener = TcpListener::bind(config.socket_addr()).await?;
        info!(address = %listener.local_addr()?, "listening");
        axum::serve(listener, router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("server stopped");
        Ok::<(), BoxError>(())
    })
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_repository(config: &ServiceConfig) -> Result<Arc<dyn TaskRepository>, BoxError> {
    match config.database_url.as_deref() {
        Some(url) if !url.is_empty() => {
            let pool = build_task_pool(url)?;
            info!("using PostgreSQL task store");
            Ok(Arc::new(PostgresTaskRepository::new(pool)))
        }
        _ => {
            warn!("DATABASE_URL is not set; tasks are kept in memory");
            Ok(Arc::new(InMemoryTaskRepository::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
