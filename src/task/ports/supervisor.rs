//! Process supervision port for agent runner launches.

use crate::task::domain::RunnerPid;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::oneshot;

/// Description of an external process to launch.
///
/// Arguments are passed to the process as a vector and never joined into a
/// shell command line. Environment entries are applied on top of the
/// inherited parent environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRequest {
    program: String,
    args: Vec<String>,
    working_dir: PathBuf,
    env: BTreeMap<String, String>,
}

impl ProcessRequest {
    /// Creates a request for `program` run inside `working_dir`.
    #[must_use]
    pub fn new(program: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.into(),
            env: BTreeMap::new(),
        }
    }

    /// Appends a single argument.
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments in order.
    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets an environment variable for the process.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Returns the program name or path.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the ordered argument list.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the working directory.
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Returns the explicit environment overrides.
    #[must_use]
    pub const fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }
}

/// Final result of a supervised process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The process ran and exited.
    Exited {
        /// Exit code, or `None` when the process was terminated by a signal.
        exit_code: Option<i32>,
        /// Standard output and standard error, interleaved by arrival.
        output: String,
    },
    /// The process could not be started.
    FailedToStart {
        /// Description of the underlying launch error.
        reason: String,
    },
}

/// Handle to a launched process.
///
/// The handle is returned before the process finishes; the outcome is
/// delivered through [`ProcessHandle::wait`].
#[derive(Debug)]
pub struct ProcessHandle {
    pid: Option<RunnerPid>,
    outcome: oneshot::Receiver<ProcessOutcome>,
}

impl ProcessHandle {
    /// Creates a handle from a pid and the receiving end of its outcome.
    #[must_use]
    pub const fn new(pid: Option<RunnerPid>, outcome: oneshot::Receiver<ProcessOutcome>) -> Self {
        Self { pid, outcome }
    }

    /// Creates a handle for a launch that failed before a pid existed.
    #[must_use]
    pub fn failed_to_start(reason: impl Into<String>) -> Self {
        let (sender, receiver) = oneshot::channel();
        // The receiver is held by `Self`, so delivery cannot fail here.
        let _delivered = sender
            .send(ProcessOutcome::FailedToStart {
                reason: reason.into(),
            })
            .is_ok();
        Self::new(None, receiver)
    }

    /// Returns the platform process identifier, if the process started.
    #[must_use]
    pub const fn pid(&self) -> Option<RunnerPid> {
        self.pid
    }

    /// Waits for the process to finish.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessSupervisorError::OutcomeLost`] when the supervisor
    /// stopped before reporting an outcome.
    pub async fn wait(self) -> Result<ProcessOutcome, ProcessSupervisorError> {
        self.outcome
            .await
            .map_err(|_| ProcessSupervisorError::OutcomeLost)
    }
}

/// Errors surfaced by process supervision.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessSupervisorError {
    /// The supervisor dropped the completion channel without an outcome.
    #[error("process supervision ended before an outcome was reported")]
    OutcomeLost,
}

/// Launches external processes without blocking the caller.
///
/// Implementations must return a handle immediately. Failures to start are
/// reported through the handle's outcome rather than as an error from
/// `launch`.
pub trait ProcessSupervisor: Send + Sync {
    /// Launches the process described by `request`.
    fn launch(&self, request: ProcessRequest) -> ProcessHandle;
}
