//! Resolve the commit, branch, and repository being watched.
//!
//! Preconditions are checked in a fixed order and each one is a hard stop.

use anyhow::Result;
use tracing::{debug, instrument};

use crate::core::line::Line;
use crate::core::types::{Context, PullRequest};
use crate::error::WaitError;
use crate::io::gh::GhCli;
use crate::io::git::Git;
use crate::io::terminal::Console;

/// Local and remote facts needed to build a [`Context`].
pub trait ContextProbe {
    fn is_repository(&self) -> bool;
    /// `None` when there is no upstream to compare against.
    fn unpushed_commits(&self) -> Result<Option<Vec<String>>>;
    fn head_sha(&self) -> Result<String>;
    fn head_short_sha(&self) -> Result<String>;
    fn current_branch(&self) -> Result<String>;
    fn repo_name_with_owner(&self) -> Result<String>;
    fn pull_request(&self) -> Result<PullRequest>;
}

/// [`ContextProbe`] backed by `git` and `gh`.
pub struct LocalProbe {
    pub git: Git,
    pub gh: GhCli,
}

impl ContextProbe for LocalProbe {
    fn is_repository(&self) -> bool {
        self.git.is_repository()
    }

    fn unpushed_commits(&self) -> Result<Option<Vec<String>>> {
        self.git.unpushed_commits()
    }

    fn head_sha(&self) -> Result<String> {
        self.git.head_sha()
    }

    fn head_short_sha(&self) -> Result<String> {
        self.git.head_short_sha()
    }

    fn current_branch(&self) -> Result<String> {
        self.git.current_branch()
    }

    fn repo_name_with_owner(&self) -> Result<String> {
        self.gh.repo_name_with_owner()
    }

    fn pull_request(&self) -> Result<PullRequest> {
        self.gh.pull_request()
    }
}

/// Check preconditions and resolve the [`Context`].
///
/// Pull-request linkage is not resolved here; see [`attach_pull_request`].
#[instrument(skip_all)]
pub fn resolve_context<P: ContextProbe, C: Console>(probe: &P, console: &mut C) -> Result<Context> {
    if !probe.is_repository() {
        return Err(WaitError::NotARepository.into());
    }

    match probe.unpushed_commits() {
        Ok(Some(commits)) if !commits.is_empty() => {
            console.warn("Unpushed commits detected:")?;
            for commit in &commits {
                console.line(&Line::plain(commit.as_str()))?;
            }
            return Err(WaitError::UnpushedCommits { commits }.into());
        }
        Ok(_) => {}
        Err(err) => debug!(err = %err, "push check unavailable, skipping"),
    }

    let commit = probe
        .head_sha()
        .map_err(|e| WaitError::context_unavailable("commit", &e))?;
    let short_commit = probe
        .head_short_sha()
        .map_err(|e| WaitError::context_unavailable("short commit", &e))?;
    let branch = probe
        .current_branch()
        .map_err(|e| WaitError::context_unavailable("branch", &e))?;
    let repo = probe
        .repo_name_with_owner()
        .map_err(|e| WaitError::context_unavailable("GitHub repository", &e))?;

    debug!(%commit, %branch, %repo, "context resolved");
    Ok(Context::new(commit, short_commit, branch, repo))
}

/// Print the resolved context.
pub fn print_context<C: Console>(ctx: &Context, console: &mut C) -> Result<()> {
    console.info(&format!("Repository: {}", ctx.repo))?;
    console.info(&format!("Branch: {}", ctx.branch))?;
    console.info(&format!("Commit: {}", ctx.short_commit))?;
    console.blank()
}

/// Best-effort pull-request lookup; failures leave the context unchanged.
pub fn attach_pull_request<P: ContextProbe>(probe: &P, ctx: &mut Context) {
    match probe.pull_request() {
        Ok(pr) => {
            debug!(number = pr.number, "pull request found");
            ctx.pull_request = Some(pr);
        }
        Err(err) => debug!(err = %err, "no pull request for branch"),
    }
}
