//! Classified failures surfaced to the user.
//!
//! Plumbing errors travel as `anyhow::Error`; these variants are attached at
//! the points where a failure has a user-facing meaning, and `main` downcasts
//! to pick an exit code.

use thiserror::Error;

use crate::core::types::RunId;

#[derive(Debug, Error)]
pub enum WaitError {
    #[error("not in a git repository")]
    NotARepository,

    #[error("push your changes first before waiting for CI")]
    UnpushedCommits { commits: Vec<String> },

    #[error("could not get {what}: {cause}")]
    ContextUnavailable { what: &'static str, cause: String },

    #[error("invalid run ID: {0}")]
    InvalidRunId(String),

    #[error("no workflow runs found for commit {short_commit}")]
    NoRunsFound { short_commit: String },

    #[error("could not get run details for {run_id}: {cause}")]
    RunDetailUnavailable { run_id: RunId, cause: String },

    #[error("{command} failed: {detail}")]
    ExternalToolFailure { command: String, detail: String },
}

impl WaitError {
    pub fn context_unavailable(what: &'static str, err: &anyhow::Error) -> Self {
        WaitError::ContextUnavailable {
            what,
            cause: format!("{err:#}"),
        }
    }
}
