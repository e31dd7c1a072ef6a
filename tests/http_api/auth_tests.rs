//! API key enforcement tests.

use crate::http_api::helpers::{TestApp, app, assert_error};
use axum::http::StatusCode;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn health_requires_no_key(app: TestApp) {
    let (status, body) = app.send("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[rstest]
#[case("GET", "/tasks", None)]
#[case("GET", "/tasks", Some("wrong-key"))]
#[case("GET", "/tasks/1", None)]
#[case("POST", "/tasks/1/run", None)]
#[case("GET", "/tasks/1/logs", Some(""))]
#[tokio::test(flavor = "multi_thread")]
async fn task_routes_reject_missing_or_wrong_key(
    #[case] method: &str,
    #[case] uri: &str,
    #[case] api_key: Option<&str>,
    app: TestApp,
) {
    let (status, body) = app.send(method, uri, None, api_key).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(&body, "UNAUTHORIZED");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_create_does_not_store_task(app: TestApp) {
    let body = json!({ "title": "Sneaky", "description": "" });
    let (status, _) = app.send("POST", "/tasks", Some(body), Some("nope")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, tasks) = app.call("GET", "/tasks", None).await;
    assert_eq!(tasks, json!([]));
}
