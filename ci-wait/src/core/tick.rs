//! One poll tick as a pure fold over observed run state.
//!
//! [`advance`] takes the state left by the previous tick plus this tick's
//! observations and returns the next state, what (if anything) to redraw, and
//! whether polling should stop. No I/O happens here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::fingerprint::{Fingerprint, Progress};
use crate::core::line::{JobState, Line, Tone};
use crate::core::types::{RunId, RunSnapshot};

/// How a run whose detail could not be fetched affects termination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnreachableRunPolicy {
    /// Complete only once the last successful fetch reported `completed`.
    /// A run that has never been fetched keeps polling alive.
    #[default]
    Block,
    /// Ignore the run for the completion check on ticks where its fetch fails.
    Exclude,
    /// Treat a failed fetch of a run not yet seen complete as a CI failure.
    Fail,
}

/// Result of fetching one run during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    Fetched(RunSnapshot),
    /// The fetch failed; the run contributes no jobs this tick.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunObservation {
    pub run: RunId,
    pub observation: Observation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSettings {
    pub fail_fast: bool,
    pub unreachable: UnreachableRunPolicy,
}

/// State threaded from one tick to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    /// Fingerprint of the block currently on screen; `None` before the first render.
    rendered: Option<Fingerprint>,
    /// Number of lines the block currently on screen occupies.
    rendered_lines: usize,
    /// Whether each run's most recent successful fetch reported `completed`.
    last_seen_complete: BTreeMap<RunId, bool>,
    any_failure: bool,
    /// Set when the `fail` policy turned a failed fetch into a failure.
    unreachable_failure: bool,
}

impl PollState {
    pub fn any_failure(&self) -> bool {
        self.any_failure
    }

    pub fn unreachable_failure(&self) -> bool {
        self.unreachable_failure
    }

    pub fn rendered_lines(&self) -> usize {
        self.rendered_lines
    }
}

/// A redraw of the progress block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Render {
    /// Lines of the previous block to erase first; `None` on the first render.
    pub clear: Option<usize>,
    /// Progress header followed by one line per job.
    pub block: Vec<Line>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Fail-fast observed a failing job.
    FailFast,
    /// Every monitored run counts as complete.
    AllComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Stop(StopReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    pub state: PollState,
    pub progress: Progress,
    pub render: Option<Render>,
    pub decision: Decision,
}

/// Fold one tick of observations into the poll state.
pub fn advance(prev: PollState, observations: &[RunObservation], settings: TickSettings) -> Tick {
    let PollState {
        rendered,
        rendered_lines,
        mut last_seen_complete,
        any_failure,
        unreachable_failure,
    } = prev;

    let mut fingerprint = Fingerprint::default();
    let mut progress = Progress::default();
    let mut job_lines = Vec::new();
    let mut tick_failure = false;
    let mut tick_unreachable = false;
    let mut all_done = true;

    for RunObservation { run, observation } in observations {
        let seen_complete = last_seen_complete.get(run).copied().unwrap_or(false);
        let run_done = match observation {
            Observation::Fetched(snapshot) => {
                for job in &snapshot.jobs {
                    fingerprint.push(*run, job);
                    progress.record(job);
                    let state = JobState::of(job);
                    tick_failure |= state.is_failure();
                    job_lines.push(state.line(&snapshot.name, &job.name));
                }
                let complete = snapshot.status.is_completed();
                last_seen_complete.insert(*run, complete);
                complete
            }
            Observation::Unavailable => match settings.unreachable {
                UnreachableRunPolicy::Block => seen_complete,
                UnreachableRunPolicy::Exclude => true,
                UnreachableRunPolicy::Fail => {
                    tick_unreachable |= !seen_complete;
                    true
                }
            },
        };
        all_done &= run_done;
    }

    let unreachable_failure = unreachable_failure || tick_unreachable;
    let any_failure = any_failure || tick_failure || tick_unreachable;

    let (render, rendered, rendered_lines) = if rendered.as_ref() == Some(&fingerprint) {
        (None, rendered, rendered_lines)
    } else {
        let mut block = Vec::with_capacity(job_lines.len() + 1);
        block.push(Line::new(Tone::Info, progress.header()));
        block.extend(job_lines);
        let lines = block.len();
        let clear = rendered.is_some().then_some(rendered_lines);
        (Some(Render { clear, block }), Some(fingerprint), lines)
    };

    let decision = if settings.fail_fast && any_failure {
        Decision::Stop(StopReason::FailFast)
    } else if all_done {
        Decision::Stop(StopReason::AllComplete)
    } else {
        Decision::Continue
    };

    Tick {
        state: PollState {
            rendered,
            rendered_lines,
            last_seen_complete,
            any_failure,
            unreachable_failure,
        },
        progress,
        render,
        decision,
    }
}
