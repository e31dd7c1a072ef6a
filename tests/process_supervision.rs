//! Integration tests for supervising real child processes.
//!
//! The scripts run through `/bin/sh`, so the suite is Unix-only.
#![cfg(unix)]

use rstest::rstest;
use std::time::Duration;
use tasklane::task::adapters::process::TokioProcessSupervisor;
use tasklane::task::ports::{ProcessOutcome, ProcessRequest, ProcessSupervisor};

const WAIT_LIMIT: Duration = Duration::from_secs(10);

fn shell(script: &str) -> ProcessRequest {
    ProcessRequest::new("sh", ".").with_args(["-c", script])
}

async fn run(supervisor: &TokioProcessSupervisor, request: ProcessRequest) -> ProcessOutcome {
    let handle = supervisor.launch(request);
    tokio::time::timeout(WAIT_LIMIT, handle.wait())
        .await
        .expect("process should finish in time")
        .expect("outcome should be delivered")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn captures_stdout_and_stderr() {
    let supervisor = TokioProcessSupervisor::new(0);

    let outcome = run(&supervisor, shell("echo out; echo err >&2")).await;

    let ProcessOutcome::Exited { exit_code, output } = outcome else {
        panic!("expected an exit, got {outcome:?}");
    };
    assert_eq!(exit_code, Some(0));
    let mut lines: Vec<&str> = output.lines().collect();
    lines.sort_unstable();
    assert_eq!(lines, ["err", "out"]);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(42)]
#[tokio::test(flavor = "multi_thread")]
async fn reports_exit_code(#[case] code: i32) {
    let supervisor = TokioProcessSupervisor::new(0);

    let outcome = run(&supervisor, shell(&format!("exit {code}"))).await;

    assert_eq!(
        outcome,
        ProcessOutcome::Exited {
            exit_code: Some(code),
            output: String::new(),
        }
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn handle_carries_pid_before_exit() {
    let supervisor = TokioProcessSupervisor::new(0);

    let handle = supervisor.launch(shell("sleep 0.2"));

    assert!(handle.pid().is_some_and(|pid| pid.value() > 0));
    let outcome = tokio::time::timeout(WAIT_LIMIT, handle.wait())
        .await
        .expect("process should finish in time")
        .expect("outcome should be delivered");
    assert!(matches!(
        outcome,
        ProcessOutcome::Exited {
            exit_code: Some(0),
            ..
        }
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_program_fails_to_start() {
    let supervisor = TokioProcessSupervisor::new(0);
    let request = ProcessRequest::new("tasklane-definitely-missing-runner", ".");

    let handle = supervisor.launch(request);

    assert_eq!(handle.pid(), None);
    let outcome = handle.wait().await.expect("outcome should be delivered");
    assert!(matches!(outcome, ProcessOutcome::FailedToStart { .. }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_working_directory_fails_to_start() {
    let supervisor = TokioProcessSupervisor::new(0);
    let request = ProcessRequest::new("sh", "/nonexistent/tasklane/workdir").with_arg("-c");

    let outcome = run(&supervisor, request).await;

    assert!(matches!(outcome, ProcessOutcome::FailedToStart { .. }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn explicit_environment_reaches_child() {
    let supervisor = TokioProcessSupervisor::new(0);
    let request = shell("printf '%s' \"$GITHUB_TOKEN\"").with_env("GITHUB_TOKEN", "ghp_child");

    let outcome = run(&supervisor, request).await;

    assert_eq!(
        outcome,
        ProcessOutcome::Exited {
            exit_code: Some(0),
            output: "ghp_child".to_owned(),
        }
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn arguments_are_not_reinterpreted_by_a_shell() {
    let supervisor = TokioProcessSupervisor::new(0);
    let request = shell("printf '%s|' \"$@\"")
        .with_args(["argv0", "two words", "$(echo injected)"]);

    let outcome = run(&supervisor, request).await;

    assert_eq!(
        outcome,
        ProcessOutcome::Exited {
            exit_code: Some(0),
            output: "two words|$(echo injected)|".to_owned(),
        }
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn oversized_output_keeps_the_tail() {
    let supervisor = TokioProcessSupervisor::new(16);

    let outcome = run(&supervisor, shell("printf 'abcdefghij0123456789'")).await;

    assert_eq!(
        outcome,
        ProcessOutcome::Exited {
            exit_code: Some(0),
            output: "[output truncated: 4 bytes dropped]\nefghij0123456789".to_owned(),
        }
    );
}
