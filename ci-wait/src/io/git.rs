//! Git adapter for resolving the commit being watched.
//!
//! A small, explicit wrapper around `git` subprocess calls.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument};

use crate::error::WaitError;
use crate::io::process::{CommandOutput, run_command};

/// Wrapper for executing git commands in a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
    timeout: Option<Duration>,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// True if the working directory is inside a git working copy.
    #[instrument(skip_all)]
    pub fn is_repository(&self) -> bool {
        match self.run(&["rev-parse", "--git-dir"]) {
            Ok(output) => output.status.success(),
            Err(err) => {
                debug!(err = %err, "git rev-parse failed to run");
                false
            }
        }
    }

    /// Commits on HEAD that the upstream branch does not have.
    ///
    /// Returns `None` when no upstream is configured.
    #[instrument(skip_all)]
    pub fn unpushed_commits(&self) -> Result<Option<Vec<String>>> {
        let output = self.run(&["log", "@{u}..HEAD", "--oneline"])?;
        if !output.status.success() {
            debug!("no upstream configured, skipping push check");
            return Ok(None);
        }
        let commits = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Some(commits))
    }

    /// Full SHA of HEAD.
    pub fn head_sha(&self) -> Result<String> {
        self.run_capture(&["rev-parse", "HEAD"])
    }

    /// Abbreviated SHA of HEAD, as git chooses its length.
    pub fn head_short_sha(&self) -> Result<String> {
        self.run_capture(&["rev-parse", "--short", "HEAD"])
    }

    /// Current branch name (empty on detached HEAD).
    #[instrument(skip_all)]
    pub fn current_branch(&self) -> Result<String> {
        let name = self.run_capture(&["branch", "--show-current"])?;
        debug!(branch = %name, "current branch");
        Ok(name)
    }

    fn run_capture(&self, args: &[&str]) -> Result<String> {
        let output = self.run_checked(args)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn run_checked(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = self.run(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("git {} failed: {}", args.join(" "), stderr.trim()));
        }
        Ok(output)
    }

    fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.workdir);
        let output = run_command(cmd, self.timeout)
            .with_context(|| format!("run git {}", args.join(" ")))?;
        if output.timed_out {
            return Err(WaitError::ExternalToolFailure {
                command: format!("git {}", args.join(" ")),
                detail: "timed out".to_string(),
            }
            .into());
        }
        Ok(output)
    }
}
