//! Construction of agent runner invocations.

use crate::task::{
    domain::{RepositoryUrl, Task},
    ports::ProcessRequest,
};
use std::fmt;
use std::path::PathBuf;

/// Environment variable carrying the repository access token.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// How the agent runner is invoked.
#[derive(Clone, PartialEq, Eq)]
pub struct RunnerSettings {
    program: String,
    base_args: Vec<String>,
    working_dir: PathBuf,
    github_token: Option<String>,
}

impl RunnerSettings {
    /// Creates settings for `program` run inside `working_dir`.
    #[must_use]
    pub fn new(program: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
            working_dir: working_dir.into(),
            github_token: None,
        }
    }

    /// Sets the arguments placed before the task-specific flags.
    #[must_use]
    pub fn with_base_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.base_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the token forwarded to the runner as [`GITHUB_TOKEN_ENV`].
    #[must_use]
    pub fn with_github_token(mut self, token: impl Into<String>) -> Self {
        self.github_token = Some(token.into());
        self
    }

    /// Returns the runner program.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the arguments placed before the task-specific flags.
    #[must_use]
    pub fn base_args(&self) -> &[String] {
        &self.base_args
    }

    /// Returns whether a repository token is configured.
    #[must_use]
    pub const fn has_github_token(&self) -> bool {
        self.github_token.is_some()
    }

    /// Builds the process request for one execution attempt of `task`.
    ///
    /// The argument list is the base arguments followed by `--repo <url>`,
    /// `--title <title>` and, when the description is not empty,
    /// `--description <description>`. Each value is a separate argument.
    #[must_use]
    pub fn build_request(&self, task: &Task, repository_url: &RepositoryUrl) -> ProcessRequest {
        let mut request = ProcessRequest::new(self.program.clone(), self.working_dir.clone())
            .with_args(self.base_args.iter().cloned())
            .with_args(["--repo", repository_url.as_str()])
            .with_args(["--title", task.title().as_str()]);
        if !task.description().is_empty() {
            request = request.with_args(["--description", task.description().as_str()]);
        }
        if let Some(token) = &self.github_token {
            request = request.with_env(GITHUB_TOKEN_ENV, token.clone());
        }
        request
    }
}

impl fmt::Debug for RunnerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnerSettings")
            .field("program", &self.program)
            .field("base_args", &self.base_args)
            .field("working_dir", &self.working_dir)
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
