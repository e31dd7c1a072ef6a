//! Task creation, listing and lookup over HTTP.

use crate::http_api::helpers::{TestApp, app, assert_error};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_returns_pending_task_in_camel_case(app: TestApp) {
    let (status, body) = app
        .call(
            "POST",
            "/tasks",
            Some(json!({ "title": "Run Test", "description": "https://github.com/acme/widgets" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["title"], "Run Test");
    assert_eq!(body["description"], "https://github.com/acme/widgets");
    assert_eq!(body["status"], "pending");
    assert!(body["runnerPid"].is_null());
    assert!(body["output"].is_null());
    assert!(body["createdAt"].is_string());
    assert!(body["updatedAt"].is_string());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_without_description_stores_empty_text(app: TestApp) {
    let (status, body) = app
        .call("POST", "/tasks", Some(json!({ "title": "Bare task" })))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["description"], "");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_reports_every_invalid_field(app: TestApp) {
    let description = "x".repeat(5001);
    let (status, body) = app
        .call(
            "POST",
            "/tasks",
            Some(json!({ "title": "ab", "description": description })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "VALIDATION_ERROR");
    let details = body["error"]["details"]
        .as_array()
        .expect("details should be a list");
    assert_eq!(details.len(), 2);
    assert!(details.iter().any(|d| d.as_str().is_some_and(|d| d.starts_with("title: "))));
    assert!(
        details
            .iter()
            .any(|d| d.as_str().is_some_and(|d| d.starts_with("description: ")))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_with_missing_title_is_rejected(app: TestApp) {
    let (status, body) = app
        .call("POST", "/tasks", Some(json!({ "description": "orphan" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "VALIDATION_ERROR");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_json_is_a_validation_error(app: TestApp) {
    let request = Request::builder()
        .method("POST")
        .uri("/tasks")
        .header("x-api-key", crate::http_api::helpers::API_KEY)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .expect("request should build");

    let (status, body) = app.send_request(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "VALIDATION_ERROR");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_returns_tasks_in_creation_order(app: TestApp) {
    app.create_task("First task", "").await;
    app.create_task("Second task", "").await;

    let (status, body) = app.call("GET", "/tasks", None).await;

    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .expect("list should be an array")
        .iter()
        .filter_map(|task| task["title"].as_str())
        .collect();
    assert_eq!(titles, ["First task", "Second task"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn get_returns_stored_task(app: TestApp) {
    let id = app.create_task("Lookup me", "details").await;

    let (status, body) = app.call("GET", &format!("/tasks/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["title"], "Lookup me");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn padded_title_is_returned_as_submitted(app: TestApp) {
    let id = app.create_task("  Run Test  ", "").await;

    let (status, body) = app.call("GET", &format!("/tasks/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "  Run Test  ");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn get_unknown_task_is_not_found(app: TestApp) {
    let (status, body) = app.call("GET", "/tasks/999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, "NOT_FOUND");
}

#[rstest]
#[case("/tasks/abc")]
#[case("/tasks/-1")]
#[case("/tasks/1.5")]
#[case("/tasks/abc/run")]
#[case("/tasks/abc/logs")]
#[tokio::test(flavor = "multi_thread")]
async fn non_numeric_id_is_a_validation_error(#[case] uri: &str, app: TestApp) {
    let method = if uri.ends_with("/run") { "POST" } else { "GET" };

    let (status, body) = app.call(method, uri, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "VALIDATION_ERROR");
}
