//! GitHub CLI adapter.
//!
//! The [`CiSource`] trait decouples discovery, polling, and reporting from the
//! `gh` binary. Tests use a scripted source that returns predetermined run
//! state without spawning processes.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::types::{PullRequest, RunId, RunSnapshot, RunSummary};
use crate::io::process::capture;

const RUN_LIST_FIELDS: &str = "databaseId,status,conclusion,name";
const RUN_VIEW_FIELDS: &str = "status,conclusion,name,jobs,url";

/// Source of truth for CI run and job state.
pub trait CiSource {
    /// Runs registered for `commit`, in the order the source reports them.
    fn list_runs(&self, commit: &str, limit: u32) -> Result<Vec<RunSummary>>;

    /// Fresh snapshot of one run and its jobs.
    fn view_run(&self, run: RunId) -> Result<RunSnapshot>;
}

/// [`CiSource`] backed by the `gh` command-line tool.
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
    timeout: Option<Duration>,
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    #[serde(rename = "nameWithOwner")]
    name_with_owner: String,
}

impl GhCli {
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// `owner/name` of the repository for the current directory.
    #[instrument(skip_all)]
    pub fn repo_name_with_owner(&self) -> Result<String> {
        let raw = self.run(&["repo", "view", "--json", "nameWithOwner"])?;
        parse_repo_info(&raw)
    }

    /// Pull request for the current branch.
    #[instrument(skip_all)]
    pub fn pull_request(&self) -> Result<PullRequest> {
        let raw = self.run(&["pr", "view", "--json", "number,url"])?;
        serde_json::from_str(&raw).context("parse pr info")
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        capture(&self.program, args, self.timeout)
    }
}

impl CiSource for GhCli {
    #[instrument(skip(self))]
    fn list_runs(&self, commit: &str, limit: u32) -> Result<Vec<RunSummary>> {
        let limit = limit.to_string();
        let raw = self.run(&[
            "run",
            "list",
            "--commit",
            commit,
            "--json",
            RUN_LIST_FIELDS,
            "--limit",
            &limit,
        ])?;
        let runs = parse_run_list(&raw)?;
        debug!(count = runs.len(), "listed runs");
        Ok(runs)
    }

    #[instrument(skip(self))]
    fn view_run(&self, run: RunId) -> Result<RunSnapshot> {
        let id = run.to_string();
        let raw = self.run(&["run", "view", &id, "--json", RUN_VIEW_FIELDS])?;
        parse_run_detail(&raw).with_context(|| format!("parse run {run}"))
    }
}

fn parse_repo_info(raw: &str) -> Result<String> {
    let info: RepoInfo = serde_json::from_str(raw).context("parse repo info")?;
    Ok(info.name_with_owner)
}

fn parse_run_list(raw: &str) -> Result<Vec<RunSummary>> {
    serde_json::from_str(raw).context("parse run list")
}

fn parse_run_detail(raw: &str) -> Result<RunSnapshot> {
    serde_json::from_str(raw).context("parse run detail")
}
