//! Discover, poll, and report for one commit.

use anyhow::Result;
use tracing::{debug, instrument};

use crate::core::tick::{StopReason, TickSettings};
use crate::core::types::Context;
use crate::discover::discover;
use crate::exit_codes;
use crate::io::clock::Sleeper;
use crate::io::config::WaitConfig;
use crate::io::gh::CiSource;
use crate::io::terminal::Console;
use crate::poll::poll;
use crate::report::report;

/// Final verdict of a wait session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Every reported run succeeded.
    Passed,
    /// Fail-fast stopped polling early on a failing job.
    FailedFast,
    /// The report found a run that did not succeed, or the `fail`
    /// unreachable-run policy recorded a failure.
    Failed,
}

impl WaitOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            WaitOutcome::Passed => exit_codes::OK,
            WaitOutcome::FailedFast | WaitOutcome::Failed => exit_codes::FAILED,
        }
    }
}

/// Options that come from the command line rather than the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaitOptions {
    /// Run id to watch instead of searching by commit.
    pub run_id: Option<String>,
    /// Wait for every job instead of stopping at the first failure.
    pub keep_going: bool,
}

/// Run a full session against a resolved [`Context`].
///
/// Precondition and discovery failures are returned as errors; CI failures
/// are an [`WaitOutcome`].
#[instrument(skip_all, fields(commit = %ctx.short_commit, keep_going = opts.keep_going))]
pub fn run_wait<S, C, Z>(
    ctx: &Context,
    opts: &WaitOptions,
    source: &S,
    console: &mut C,
    sleeper: &Z,
    cfg: &WaitConfig,
) -> Result<WaitOutcome>
where
    S: CiSource,
    C: Console,
    Z: Sleeper,
{
    let runs = discover(ctx, opts.run_id.as_deref(), source, console, sleeper, cfg)?;

    let settings = TickSettings {
        fail_fast: !opts.keep_going,
        unreachable: cfg.unreachable_runs,
    };
    let polled = poll(&runs, source, console, sleeper, settings, cfg.poll_interval())?;

    let passed = report(&runs, ctx, source, console)?;
    debug!(?polled, passed, "session finished");

    let outcome = if polled.stop == StopReason::FailFast {
        WaitOutcome::FailedFast
    } else if polled.unreachable_failure || !passed {
        WaitOutcome::Failed
    } else {
        WaitOutcome::Passed
    };
    Ok(outcome)
}
