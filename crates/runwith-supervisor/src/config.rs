//! Supervision configuration.
//!
//! A [`SupervisionConfig`] is immutable once built. Build one with
//! [`SupervisionConfig::builder`]:
//!
//! ```rust
//! use runwith_supervisor::SupervisionConfig;
//! use std::time::Duration;
//!
//! let config = SupervisionConfig::builder(["sleep", "5"])
//!     .time_limit(Duration::from_millis(200))
//!     .build()
//!     .unwrap();
//! assert_eq!(config.command(), ["sleep", "5"]);
//! assert_eq!(config.grace_time(), None);
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use runwith_common::{display_command, ConfigResult};
use runwith_process::{validate_command, StdioRedirects};
use runwith_timespan::format_timespan;
use tracing::warn;

/// Everything needed to supervise one child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisionConfig {
    command: Vec<String>,
    redirects: StdioRedirects,
    working_dir: Option<PathBuf>,
    time_limit: Option<Duration>,
    grace_time: Option<Duration>,
}

impl SupervisionConfig {
    /// Start building a configuration for `command` (argv, program first).
    pub fn builder<I, S>(command: I) -> SupervisionConfigBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SupervisionConfigBuilder::new(command)
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// The command rendered for messages.
    pub fn display_command(&self) -> String {
        display_command(&self.command)
    }

    pub fn redirects(&self) -> &StdioRedirects {
        &self.redirects
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Grace time between soft and hard stop.
    ///
    /// `None` when no time limit is set or the grace time is zero; both mean
    /// the deadline escalates straight to a hard stop (or never escalates).
    pub fn grace_time(&self) -> Option<Duration> {
        self.time_limit?;
        self.grace_time.filter(|grace| !grace.is_zero())
    }
}

impl fmt::Display for SupervisionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_command())?;
        if let Some(limit) = self.time_limit {
            write!(f, " time-limit={}", format_timespan(limit))?;
        }
        if let Some(grace) = self.grace_time() {
            write!(f, " grace-time={}", format_timespan(grace))?;
        }
        if let Some(dir) = &self.working_dir {
            write!(f, " cwd={}", dir.display())?;
        }
        let streams = [
            ("stdin", &self.redirects.stdin),
            ("stdout", &self.redirects.stdout),
            ("stderr", &self.redirects.stderr),
        ];
        for (name, path) in streams {
            if let Some(path) = path {
                write!(f, " {}={}", name, path.display())?;
            }
        }
        Ok(())
    }
}

/// Locally constructed builder for [`SupervisionConfig`].
#[derive(Debug, Clone, Default)]
pub struct SupervisionConfigBuilder {
    command: Vec<String>,
    redirects: StdioRedirects,
    working_dir: Option<PathBuf>,
    time_limit: Option<Duration>,
    grace_time: Option<Duration>,
}

impl SupervisionConfigBuilder {
    pub fn new<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn stdin(mut self, path: impl Into<PathBuf>) -> Self {
        self.redirects.stdin = Some(path.into());
        self
    }

    pub fn stdout(mut self, path: impl Into<PathBuf>) -> Self {
        self.redirects.stdout = Some(path.into());
        self
    }

    pub fn stderr(mut self, path: impl Into<PathBuf>) -> Self {
        self.redirects.stderr = Some(path.into());
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn grace_time(mut self, grace: Duration) -> Self {
        self.grace_time = Some(grace);
        self
    }

    /// Set optional fields in one go, as produced by an argument parser.
    pub fn redirects(mut self, redirects: StdioRedirects) -> Self {
        self.redirects = redirects;
        self
    }

    pub fn maybe_working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    pub fn maybe_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn maybe_grace_time(mut self, grace: Option<Duration>) -> Self {
        self.grace_time = grace;
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// Fails when the command is empty or its program name is empty.
    pub fn build(self) -> ConfigResult<SupervisionConfig> {
        validate_command(&self.command)?;

        if self.time_limit.is_none() && self.grace_time.is_some() {
            warn!(
                "Grace time ignored for {}: no time limit set",
                display_command(&self.command)
            );
        }

        Ok(SupervisionConfig {
            command: self.command,
            redirects: self.redirects,
            working_dir: self.working_dir,
            time_limit: self.time_limit,
            grace_time: self.grace_time,
        })
    }
}
