//! Execution requests and log retrieval over HTTP.

use crate::http_api::helpers::{TestApp, app, assert_error};
use axum::http::StatusCode;
use rstest::rstest;
use serde_json::json;
use std::time::Duration;
use tasklane::task::domain::RunnerPid;

const REPO_DESCRIPTION: &str = "See https://github.com/acme/widgets for details";

impl TestApp {
    async fn wait_for_status(&self, id: i64, expected: &str) -> serde_json::Value {
        for _ in 0..200 {
            let (_, body) = self.call("GET", &format!("/tasks/{id}"), None).await;
            if body["status"] == expected {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("task {id} never reached status {expected}");
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn run_starts_execution_and_marks_task_running(app: TestApp) {
    let id = app.create_task("Run Test", REPO_DESCRIPTION).await;

    let (status, body) = app.call("POST", &format!("/tasks/{id}/run"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task execution started");
    assert_eq!(body["taskId"], id);
    assert!(body["runnerPid"].is_u64());

    let (_, task) = app.call("GET", &format!("/tasks/{id}"), None).await;
    assert_eq!(task["status"], "running");
    assert_eq!(task["runnerPid"], body["runnerPid"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn run_without_repository_url_keeps_task_pending(app: TestApp) {
    let id = app.create_task("No URL", "nothing here").await;

    let (status, body) = app.call("POST", &format!("/tasks/{id}/run"), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "BAD_REQUEST");
    let (_, task) = app.call("GET", &format!("/tasks/{id}"), None).await;
    assert_eq!(task["status"], "pending");
    assert!(app.supervisor.launches().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn run_of_unknown_task_is_not_found(app: TestApp) {
    let (status, body) = app.call("POST", "/tasks/41/run", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, "NOT_FOUND");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_run_while_running_conflicts(app: TestApp) {
    let id = app.create_task("Run Test", REPO_DESCRIPTION).await;
    let (first, _) = app.call("POST", &format!("/tasks/{id}/run"), None).await;
    assert_eq!(first, StatusCode::OK);

    let (status, body) = app.call("POST", &format!("/tasks/{id}/run"), None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_error(&body, "CONFLICT");
    assert_eq!(app.supervisor.launches().len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn logs_are_empty_before_any_run(app: TestApp) {
    let id = app.create_task("Quiet task", "").await;

    let (status, body) = app.call("GET", &format!("/tasks/{id}/logs"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "logs": [], "status": "pending", "runnerPid": null })
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn finished_run_exposes_output_lines(app: TestApp) {
    let id = app.create_task("Run Test", REPO_DESCRIPTION).await;
    let (_, started) = app.call("POST", &format!("/tasks/{id}/run"), None).await;
    let pid = started["runnerPid"]
        .as_u64()
        .and_then(|pid| u32::try_from(pid).ok())
        .expect("runnerPid should be a u32");

    assert!(app.supervisor.exit(RunnerPid::new(pid), 0, "cloning\npushing\n"));
    app.wait_for_status(id, "done").await;

    let (status, body) = app.call("GET", &format!("/tasks/{id}/logs"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "logs": ["cloning", "pushing"], "status": "done", "runnerPid": pid })
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn launch_failure_surfaces_as_error_status(app: TestApp) {
    let id = app.create_task("Run Test", REPO_DESCRIPTION).await;
    app.supervisor.fail_next_launch("program not found");

    let (status, body) = app.call("POST", &format!("/tasks/{id}/run"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["runnerPid"].is_null());

    let task = app.wait_for_status(id, "error").await;
    assert_eq!(
        task["output"],
        "Failed to start agent runner: program not found"
    );
}
