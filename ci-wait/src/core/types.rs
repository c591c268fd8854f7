//! Shared deterministic types for CI run state.
//!
//! These mirror the JSON the `gh` CLI emits for runs and jobs. Status and
//! conclusion strings outside the known set are kept verbatim so they can be
//! rendered and fingerprinted without loss.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer handle naming one CI run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle phase of a run or job.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Queued,
    Waiting,
    InProgress,
    Completed,
    #[default]
    Unknown,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Queued => "queued",
            Status::Waiting => "waiting",
            Status::InProgress => "in_progress",
            Status::Completed => "completed",
            Status::Unknown => "",
            Status::Other(raw) => raw,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Status::Completed)
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "queued" => Status::Queued,
            "waiting" => Status::Waiting,
            "in_progress" => Status::InProgress,
            "completed" => Status::Completed,
            "" => Status::Unknown,
            _ => Status::Other(raw),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

/// Terminal outcome of a completed run or job.
///
/// `gh` reports an empty string until the run or job completes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Conclusion {
    Success,
    Failure,
    Skipped,
    #[default]
    Pending,
    Other(String),
}

impl Conclusion {
    pub fn as_str(&self) -> &str {
        match self {
            Conclusion::Success => "success",
            Conclusion::Failure => "failure",
            Conclusion::Skipped => "skipped",
            Conclusion::Pending => "",
            Conclusion::Other(raw) => raw,
        }
    }

    /// True for outcomes that do not fail a run.
    pub fn is_passing(&self) -> bool {
        matches!(self, Conclusion::Success | Conclusion::Skipped)
    }
}

impl From<String> for Conclusion {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "success" => Conclusion::Success,
            "failure" => Conclusion::Failure,
            "skipped" => Conclusion::Skipped,
            "" => Conclusion::Pending,
            _ => Conclusion::Other(raw),
        }
    }
}

impl From<Conclusion> for String {
    fn from(conclusion: Conclusion) -> Self {
        conclusion.as_str().to_string()
    }
}

/// Point-in-time state of one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSnapshot {
    #[serde(rename = "databaseId")]
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub status: Status,
    #[serde(default, deserialize_with = "nullable")]
    pub conclusion: Conclusion,
}

impl JobSnapshot {
    /// A completed job whose conclusion is neither `success` nor `skipped`.
    pub fn is_failing(&self) -> bool {
        self.status.is_completed() && !self.conclusion.is_passing()
    }
}

/// Point-in-time state of one run, as returned by `gh run view`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSnapshot {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub status: Status,
    #[serde(default, deserialize_with = "nullable")]
    pub conclusion: Conclusion,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub jobs: Vec<JobSnapshot>,
}

impl RunSnapshot {
    /// Conclusion is only meaningful once the run has completed.
    pub fn conclusion(&self) -> Option<&Conclusion> {
        self.status.is_completed().then_some(&self.conclusion)
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.conclusion(), Some(Conclusion::Success))
    }
}

/// One entry of `gh run list --json databaseId,status,conclusion,name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(rename = "databaseId")]
    pub id: RunId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub status: Status,
    #[serde(default, deserialize_with = "nullable")]
    pub conclusion: Conclusion,
}

/// A run selected for monitoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredRun {
    pub id: RunId,
    /// Declared workflow name; absent when the id was given explicitly.
    pub name: Option<String>,
}

/// Everything known about the commit being watched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Context {
    pub commit: String,
    pub short_commit: String,
    pub branch: String,
    /// `owner/name`.
    pub repo: String,
    pub commit_url: String,
    pub pull_request: Option<PullRequest>,
}

impl Context {
    pub fn new(commit: String, short_commit: String, branch: String, repo: String) -> Self {
        let commit_url = format!("https://github.com/{repo}/commit/{commit}");
        Self {
            commit,
            short_commit,
            branch,
            repo,
            commit_url,
            pull_request: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub url: String,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: From<String>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(T::from(raw.unwrap_or_default()))
}
