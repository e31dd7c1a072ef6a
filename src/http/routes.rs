//! Route handlers for the task API.

use super::{
    ApiError, AppState,
    dto::{CreateTaskBody, ExecutionStartedView, TaskLogsView, TaskView},
};
use crate::task::{domain::TaskId, services::CreateTaskRequest};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::{Value, json};

/// `GET /health`
#[expect(clippy::unused_async, reason = "axum handlers are async functions")]
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /tasks`
pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<CreateTaskBody>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskView>), ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::validation(vec![rejection.body_text()]))?;
    let mut request = CreateTaskRequest::new(body.title);
    if let Some(description) = body.description {
        request = request.with_description(description);
    }
    let task = state.catalog().create_task(request).await?;
    Ok((StatusCode::CREATED, Json(TaskView::from(&task))))
}

/// `GET /tasks`
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<TaskView>>, ApiError> {
    let tasks = state.catalog().list_tasks().await?;
    Ok(Json(tasks.iter().map(TaskView::from).collect()))
}

/// `GET /tasks/{id}`
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskView>, ApiError> {
    let task = state.catalog().get_task(TaskId::parse(&id)?).await?;
    Ok(Json(TaskView::from(&task)))
}

/// `POST /tasks/{id}/run`
///
/// Responds once the runner has been launched; the final status is written
/// in the background.
pub async fn run_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExecutionStartedView>, ApiError> {
    let started = state.execution().start_execution(TaskId::parse(&id)?).await?;
    Ok(Json(ExecutionStartedView::from(&started)))
}

/// `GET /tasks/{id}/logs`
pub async fn task_logs(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskLogsView>, ApiError> {
    let logs = state.catalog().task_logs(TaskId::parse(&id)?).await?;
    Ok(Json(TaskLogsView::from(logs)))
}
