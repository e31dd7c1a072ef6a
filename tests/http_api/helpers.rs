//! Shared fixtures for HTTP API tests.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use rstest::fixture;
use serde_json::Value;
use std::sync::Arc;
use tasklane::http::{AppState, router};
use tasklane::task::adapters::memory::{InMemoryTaskRepository, ScriptedProcessSupervisor};
use tasklane::task::services::RunnerSettings;
use tower::ServiceExt;

/// API key configured for every test application.
pub const API_KEY: &str = "test-api-key";

/// Router together with the scripted supervisor behind it.
pub struct TestApp {
    pub router: Router,
    pub supervisor: Arc<ScriptedProcessSupervisor>,
}

#[fixture]
pub fn app() -> TestApp {
    let supervisor = Arc::new(ScriptedProcessSupervisor::new());
    let state = AppState::new(
        Arc::new(InMemoryTaskRepository::new()),
        supervisor.clone(),
        RunnerSettings::new("agent-runner", "."),
        API_KEY,
    );
    TestApp {
        router: router(state),
        supervisor,
    }
}

impl TestApp {
    /// Sends an authenticated request and returns the status and JSON body.
    pub async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, body, Some(API_KEY)).await
    }

    /// Sends a request with an optional API key.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        api_key: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = api_key {
            builder = builder.header("x-api-key", key);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");
        self.send_request(request).await
    }

    /// Sends a prepared request.
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body should be JSON")
        };
        (status, json)
    }

    /// Creates a task and returns its id.
    pub async fn create_task(&self, title: &str, description: &str) -> i64 {
        let (status, body) = self
            .call(
                "POST",
                "/tasks",
                Some(serde_json::json!({ "title": title, "description": description })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
        body["id"].as_i64().expect("id should be an integer")
    }
}

/// Asserts that `body` is an error envelope carrying `code`.
pub fn assert_error(body: &Value, code: &str) {
    assert_eq!(body["error"]["code"], code, "unexpected body: {body}");
    assert!(body["error"]["message"].is_string());
    assert!(body["timestamp"].is_string());
}
