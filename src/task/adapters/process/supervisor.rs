//! Process supervisor backed by `tokio::process`.

use super::OutputBuffer;
use crate::task::{
    domain::RunnerPid,
    ports::{ProcessHandle, ProcessOutcome, ProcessRequest, ProcessSupervisor},
};
use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

const READ_CHUNK_BYTES: usize = 8 * 1024;

type SharedOutput = Arc<Mutex<OutputBuffer>>;

/// Supervisor that spawns real child processes.
///
/// Standard output and standard error are drained concurrently into one
/// bounded buffer. The child inherits the parent environment, with the
/// request's explicit entries applied on top.
#[derive(Debug, Clone, Copy)]
pub struct TokioProcessSupervisor {
    output_limit: usize,
}

impl TokioProcessSupervisor {
    /// Creates a supervisor that keeps at most `output_limit` bytes of output
    /// per process. A limit of zero disables bounding.
    #[must_use]
    pub const fn new(output_limit: usize) -> Self {
        Self { output_limit }
    }
}

impl ProcessSupervisor for TokioProcessSupervisor {
    /// Spawns the process and returns without waiting for it.
    ///
    /// Must be called from within a Tokio runtime.
    fn launch(&self, request: ProcessRequest) -> ProcessHandle {
        let mut command = Command::new(request.program());
        command
            .args(request.args())
            .current_dir(request.working_dir())
            .envs(request.env())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(err) => {
                warn!(
                    program = request.program(),
                    error = %err,
                    "agent process failed to start"
                );
                return ProcessHandle::failed_to_start(err.to_string());
            }
        };

        let pid = child.id().map(RunnerPid::new);
        info!(
            program = request.program(),
            pid = pid.map(RunnerPid::value),
            "agent process started"
        );

        let output: SharedOutput = Arc::new(Mutex::new(OutputBuffer::new(self.output_limit)));
        let mut readers = Vec::with_capacity(2);
        if let Some(stream) = child.stdout.take() {
            readers.push(tokio::spawn(drain(stream, Arc::clone(&output))));
        }
        if let Some(stream) = child.stderr.take() {
            readers.push(tokio::spawn(drain(stream, Arc::clone(&output))));
        }

        let (sender, receiver) = oneshot::channel();
        tokio::spawn(async move {
            let status = child.wait().await;
            for reader in readers {
                if let Err(err) = reader.await {
                    warn!(error = %err, "agent output reader stopped abnormally");
                }
            }
            let buffer = std::mem::take(&mut *lock(&output));
            let text = buffer.into_text();

            let pid_value = pid.map(RunnerPid::value);
            let outcome = match status {
                Ok(status) => {
                    info!(pid = pid_value, exit_code = status.code(), "agent process exited");
                    ProcessOutcome::Exited {
                        exit_code: status.code(),
                        output: text,
                    }
                }
                Err(err) => {
                    warn!(pid = pid_value, error = %err, "failed to wait for agent process");
                    ProcessOutcome::Exited {
                        exit_code: None,
                        output: format!("{text}\nfailed to wait for agent process: {err}"),
                    }
                }
            };

            if sender.send(outcome).is_err() {
                debug!(pid = pid_value, "agent outcome receiver dropped");
            }
        });

        ProcessHandle::new(pid, receiver)
    }
}

fn lock(output: &SharedOutput) -> std::sync::MutexGuard<'_, OutputBuffer> {
    output.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn drain(mut stream: impl AsyncRead + Unpin, output: SharedOutput) {
    let mut chunk = [0_u8; READ_CHUNK_BYTES];
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) => break,
            Ok(read) => {
                if let Some(bytes) = chunk.get(..read) {
                    lock(&output).push(bytes);
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to read agent output");
                break;
            }
        }
    }
}
