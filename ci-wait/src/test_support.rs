//! Test-only fakes for the CI source, console, sleeper, and context probe.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use anyhow::{Result, anyhow};

use crate::context::ContextProbe;
use crate::core::line::{Line, Tone};
use crate::core::types::{
    Conclusion, Context, JobSnapshot, PullRequest, RunId, RunSnapshot, RunSummary, Status,
};
use crate::io::clock::Sleeper;
use crate::io::gh::CiSource;
use crate::io::terminal::Console;

/// Build a job snapshot from raw `gh` strings.
pub fn job(id: u64, name: &str, status: &str, conclusion: &str) -> JobSnapshot {
    JobSnapshot {
        id,
        name: name.to_string(),
        status: Status::from(status.to_string()),
        conclusion: Conclusion::from(conclusion.to_string()),
    }
}

/// Build a run snapshot named `name` from raw `gh` strings.
pub fn run(name: &str, status: &str, conclusion: &str, jobs: Vec<JobSnapshot>) -> RunSnapshot {
    RunSnapshot {
        name: name.to_string(),
        status: Status::from(status.to_string()),
        conclusion: Conclusion::from(conclusion.to_string()),
        url: format!("https://github.com/octo/widgets/actions/runs/{name}"),
        jobs,
    }
}

pub fn summary(id: u64, name: &str) -> RunSummary {
    RunSummary {
        id: RunId(id),
        name: name.to_string(),
        status: Status::Queued,
        conclusion: Conclusion::Pending,
    }
}

/// Deterministic context for `octo/widgets`.
pub fn context() -> Context {
    Context::new(
        "0123456789abcdef0123456789abcdef01234567".to_string(),
        "0123456".to_string(),
        "main".to_string(),
        "octo/widgets".to_string(),
    )
}

/// [`CiSource`] that replays scripted responses.
///
/// `gh run list` responses are consumed in order; once exhausted every call
/// returns an empty list. Each run's `gh run view` responses are consumed in
/// order and the last one repeats. `None` scripts a failed fetch.
#[derive(Default)]
pub struct ScriptedCi {
    lists: RefCell<VecDeque<Option<Vec<RunSummary>>>>,
    views: RefCell<BTreeMap<RunId, VecDeque<Option<RunSnapshot>>>>,
    list_calls: Cell<usize>,
    view_calls: RefCell<Vec<RunId>>,
}

impl ScriptedCi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(self, response: Option<Vec<RunSummary>>) -> Self {
        self.lists.borrow_mut().push_back(response);
        self
    }

    pub fn with_views(self, run: u64, responses: Vec<Option<RunSnapshot>>) -> Self {
        self.views
            .borrow_mut()
            .insert(RunId(run), responses.into_iter().collect());
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }

    pub fn view_calls(&self) -> Vec<RunId> {
        self.view_calls.borrow().clone()
    }
}

impl CiSource for ScriptedCi {
    fn list_runs(&self, _commit: &str, _limit: u32) -> Result<Vec<RunSummary>> {
        self.list_calls.set(self.list_calls.get() + 1);
        match self.lists.borrow_mut().pop_front() {
            Some(Some(runs)) => Ok(runs),
            Some(None) => Err(anyhow!("scripted list failure")),
            None => Ok(Vec::new()),
        }
    }

    fn view_run(&self, run: RunId) -> Result<RunSnapshot> {
        self.view_calls.borrow_mut().push(run);
        let mut views = self.views.borrow_mut();
        let queue = views
            .get_mut(&run)
            .ok_or_else(|| anyhow!("no scripted views for run {run}"))?;
        let next = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        next.flatten()
            .ok_or_else(|| anyhow!("scripted view failure for run {run}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    Line(Tone, String),
    Block(Vec<String>),
    Clear(usize),
}

/// [`Console`] that records output as plain strings.
#[derive(Debug, Default)]
pub struct RecordingConsole {
    pub events: Vec<ConsoleEvent>,
}

impl RecordingConsole {
    /// Every printed line in order, including progress block lines.
    pub fn plain_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for event in &self.events {
            match event {
                ConsoleEvent::Line(_, text) => lines.push(text.clone()),
                ConsoleEvent::Block(block) => lines.extend(block.iter().cloned()),
                ConsoleEvent::Clear(_) => {}
            }
        }
        lines
    }

    pub fn blocks(&self) -> Vec<Vec<String>> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ConsoleEvent::Block(block) => Some(block.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clears(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ConsoleEvent::Clear(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.plain_lines().iter().any(|line| line.contains(needle))
    }
}

impl Console for RecordingConsole {
    fn line(&mut self, line: &Line) -> Result<()> {
        self.events
            .push(ConsoleEvent::Line(line.tone, line.to_plain()));
        Ok(())
    }

    fn clear_last_block(&mut self, line_count: usize) -> Result<()> {
        self.events.push(ConsoleEvent::Clear(line_count));
        Ok(())
    }

    fn write_block(&mut self, lines: &[Line]) -> Result<()> {
        self.events
            .push(ConsoleEvent::Block(lines.iter().map(Line::to_plain).collect()));
        Ok(())
    }
}

/// [`Sleeper`] that records requested durations without sleeping.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    pub sleeps: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn count(&self) -> usize {
        self.sleeps.borrow().len()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}

/// [`ContextProbe`] with fixed answers. `None` fields fail.
#[derive(Debug, Clone)]
pub struct StaticProbe {
    pub repository: bool,
    pub unpushed: Option<Vec<String>>,
    pub repo: Option<String>,
    pub pull_request: Option<PullRequest>,
}

impl Default for StaticProbe {
    fn default() -> Self {
        Self {
            repository: true,
            unpushed: Some(Vec::new()),
            repo: Some("octo/widgets".to_string()),
            pull_request: None,
        }
    }
}

impl ContextProbe for StaticProbe {
    fn is_repository(&self) -> bool {
        self.repository
    }

    fn unpushed_commits(&self) -> Result<Option<Vec<String>>> {
        Ok(self.unpushed.clone())
    }

    fn head_sha(&self) -> Result<String> {
        Ok(context().commit)
    }

    fn head_short_sha(&self) -> Result<String> {
        Ok(context().short_commit)
    }

    fn current_branch(&self) -> Result<String> {
        Ok(context().branch)
    }

    fn repo_name_with_owner(&self) -> Result<String> {
        self.repo
            .clone()
            .ok_or_else(|| anyhow!("gh repo view failed"))
    }

    fn pull_request(&self) -> Result<PullRequest> {
        self.pull_request
            .clone()
            .ok_or_else(|| anyhow!("no pull requests found for branch"))
    }
}
