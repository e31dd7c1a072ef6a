//! Service configuration, parsed once at start-up.
//!
//! Every option can be given as a command-line flag or through the
//! environment; a `.env` file in the working directory is honoured by the
//! binary before parsing.

use crate::task::services::RunnerSettings;
use clap::Parser;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

/// API key used when none is configured.
pub const DEFAULT_API_KEY: &str = "default-api-key";

/// Errors raised while interpreting configuration values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The runner argument string has unbalanced quoting.
    #[error("cannot split runner arguments: {0}")]
    InvalidRunnerArgs(String),
}

/// Immutable service configuration.
#[derive(Clone, Parser)]
#[command(name = "tasklane", version, about = "Task tracking API with agent runner execution")]
pub struct ServiceConfig {
    /// Address to bind the HTTP listener to.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to bind the HTTP listener to.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Value expected in the `x-api-key` header.
    #[arg(long, env = "API_KEY", default_value = DEFAULT_API_KEY, hide_env_values = true)]
    pub api_key: String,

    /// `PostgreSQL` connection URL; the in-memory store is used when absent.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Default log filter when `RUST_LOG` is not set.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Token forwarded to the agent runner as `GITHUB_TOKEN`.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Agent runner program.
    #[arg(long, env = "RUNNER_COMMAND", default_value = "npx")]
    pub runner_command: String,

    /// Arguments placed before the task-specific flags, split like a POSIX
    /// shell would split them.
    #[arg(
        long,
        env = "RUNNER_ARGS",
        default_value = "--prefix ../efizion-agent-runner efizion run",
        allow_hyphen_values = true
    )]
    pub runner_args: String,

    /// Working directory of the agent runner.
    #[arg(long, env = "RUNNER_WORKDIR", default_value = ".")]
    pub runner_workdir: PathBuf,

    /// Upper bound on captured output per execution, in bytes; `0` keeps
    /// everything.
    #[arg(long, env = "MAX_OUTPUT_BYTES", default_value_t = 1024 * 1024)]
    pub max_output_bytes: usize,
}

impl ServiceConfig {
    /// Returns the socket address to listen on.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns whether the built-in API key is in use.
    #[must_use]
    pub fn uses_default_api_key(&self) -> bool {
        self.api_key == DEFAULT_API_KEY
    }

    /// Builds the agent runner settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRunnerArgs`] when the runner arguments
    /// cannot be split.
    pub fn runner_settings(&self) -> Result<RunnerSettings, ConfigError> {
        let base_args = shlex::split(&self.runner_args)
            .ok_or_else(|| ConfigError::InvalidRunnerArgs(self.runner_args.clone()))?;
        let settings =
            RunnerSettings::new(self.runner_command.clone(), self.runner_workdir.clone())
                .with_base_args(base_args);
        Ok(match &self.github_token {
            Some(token) if !token.is_empty() => settings.with_github_token(token.clone()),
            _ => settings,
        })
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &"<redacted>")
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("log_level", &self.log_level)
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("runner_command", &self.runner_command)
            .field("runner_args", &self.runner_args)
            .field("runner_workdir", &self.runner_workdir)
            .field("max_output_bytes", &self.max_output_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ServiceConfig};
    use clap::Parser;
    use rstest::rstest;

    fn parse(args: &[&str]) -> ServiceConfig {
        let argv = std::iter::once("tasklane").chain(args.iter().copied());
        ServiceConfig::try_parse_from(argv).expect("arguments should parse")
    }

    #[rstest]
    fn runner_args_are_split_like_a_shell() {
        let config = parse(&["--runner-args", "--prefix '../agent runner' efizion run"]);
        let settings = config.runner_settings().expect("runner args should split");
        assert_eq!(settings.program(), config.runner_command);
        assert_eq!(
            settings.base_args(),
            ["--prefix", "../agent runner", "efizion", "run"]
        );
    }

    #[rstest]
    fn unbalanced_quotes_are_rejected() {
        let config = parse(&["--runner-args", "run 'unterminated"]);
        assert_eq!(
            config.runner_settings(),
            Err(ConfigError::InvalidRunnerArgs("run 'unterminated".to_owned()))
        );
    }

    #[rstest]
    fn empty_github_token_is_ignored() {
        let config = parse(&["--github-token", ""]);
        let settings = config.runner_settings().expect("runner args should split");
        assert!(!settings.has_github_token());
    }

    #[rstest]
    fn debug_output_redacts_secrets() {
        let config = parse(&["--api-key", "s3cret", "--github-token", "ghp_abcdef"]);
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("ghp_abcdef"));
    }
}
