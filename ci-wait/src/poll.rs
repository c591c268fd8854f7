//! Drive the poll loop against a live CI source.
//!
//! All decisions are made by [`advance`]; this module fetches, draws, and
//! sleeps.

use std::time::Duration;

use anyhow::Result;
use tracing::{debug, instrument};

use crate::core::tick::{
    Decision, Observation, PollState, RunObservation, StopReason, TickSettings, advance,
};
use crate::core::types::DiscoveredRun;
use crate::io::clock::Sleeper;
use crate::io::gh::CiSource;
use crate::io::terminal::Console;

/// How polling ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    /// Sticky across ticks: true once any failure was observed.
    pub any_failure: bool,
    /// True when the `fail` unreachable-run policy recorded a failure.
    pub unreachable_failure: bool,
    pub stop: StopReason,
}

/// Fetch every run once, in order. A failed fetch becomes
/// [`Observation::Unavailable`].
pub fn observe<S: CiSource>(runs: &[DiscoveredRun], source: &S) -> Vec<RunObservation> {
    runs.iter()
        .map(|run| {
            let observation = match source.view_run(run.id) {
                Ok(snapshot) => Observation::Fetched(snapshot),
                Err(err) => {
                    debug!(
                        run = %run.id,
                        name = run.name.as_deref().unwrap_or_default(),
                        err = %format!("{err:#}"),
                        "run detail unavailable"
                    );
                    Observation::Unavailable
                }
            };
            RunObservation {
                run: run.id,
                observation,
            }
        })
        .collect()
}

/// Poll until every run is complete, or until the first failure when
/// `settings.fail_fast` is set.
#[instrument(skip_all, fields(runs = runs.len(), fail_fast = settings.fail_fast))]
pub fn poll<S, C, Z>(
    runs: &[DiscoveredRun],
    source: &S,
    console: &mut C,
    sleeper: &Z,
    settings: TickSettings,
    interval: Duration,
) -> Result<PollOutcome>
where
    S: CiSource,
    C: Console,
    Z: Sleeper,
{
    console.info("Waiting for all runs to complete...")?;
    console.blank()?;

    let mut state = PollState::default();
    let mut ticks = 0u64;
    loop {
        ticks += 1;
        let observations = observe(runs, source);
        let tick = advance(state, &observations, settings);
        state = tick.state;

        if let Some(render) = tick.render {
            if let Some(line_count) = render.clear {
                console.clear_last_block(line_count)?;
            }
            console.write_block(&render.block)?;
        }

        match tick.decision {
            Decision::Continue => sleeper.sleep(interval),
            Decision::Stop(stop) => {
                debug!(ticks, ?stop, any_failure = state.any_failure(), "polling finished");
                console.blank()?;
                if stop == StopReason::FailFast {
                    console.warn(
                        "Failure detected, exiting early (use --keep-going to wait for all jobs)",
                    )?;
                }
                return Ok(PollOutcome {
                    any_failure: state.any_failure(),
                    unreachable_failure: state.unreachable_failure(),
                    stop,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tick::UnreachableRunPolicy;
    use crate::core::types::RunId;
    use crate::test_support::{RecordingConsole, RecordingSleeper, ScriptedCi, job, run};

    fn discovered(id: u64) -> DiscoveredRun {
        DiscoveredRun {
            id: RunId(id),
            name: Some("CI".to_string()),
        }
    }

    fn settings(fail_fast: bool) -> TickSettings {
        TickSettings {
            fail_fast,
            unreachable: UnreachableRunPolicy::Block,
        }
    }

    #[test]
    fn redraws_only_on_change() {
        let queued = run("CI", "queued", "", vec![job(1, "build", "queued", "")]);
        let running = run("CI", "in_progress", "", vec![job(1, "build", "in_progress", "")]);
        let done = run(
            "CI",
            "completed",
            "success",
            vec![job(1, "build", "completed", "success")],
        );
        let ci = ScriptedCi::new().with_views(
            1,
            vec![
                Some(queued.clone()),
                Some(queued),
                Some(running),
                Some(done),
            ],
        );
        let sleeper = RecordingSleeper::default();
        let mut console = RecordingConsole::default();

        let outcome = poll(
            &[discovered(1)],
            &ci,
            &mut console,
            &sleeper,
            settings(true),
            Duration::from_secs(5),
        )
        .expect("poll");

        assert_eq!(
            outcome,
            PollOutcome {
                any_failure: false,
                unreachable_failure: false,
                stop: StopReason::AllComplete
            }
        );
        assert_eq!(sleeper.count(), 3);
        assert_eq!(
            console.blocks(),
            vec![
                vec!["Progress: 0/1 (0%)", "  [WAIT] CI / build"],
                vec!["Progress: 0/1 (0%)", "  [RUN] CI / build"],
                vec!["Progress: 1/1 (100%)", "  [OK] CI / build"],
            ]
        );
        assert_eq!(console.clears(), vec![2, 2]);
        assert_eq!(
            console.plain_lines().first().map(String::as_str),
            Some("Waiting for all runs to complete...")
        );
    }

    #[test]
    fn fail_fast_stops_on_first_failure() {
        let failing = run(
            "CI",
            "in_progress",
            "",
            vec![
                job(1, "build", "completed", "success"),
                job(2, "test", "completed", "failure"),
                job(3, "lint", "in_progress", ""),
            ],
        );
        let ci = ScriptedCi::new().with_views(1, vec![Some(failing)]);
        let sleeper = RecordingSleeper::default();
        let mut console = RecordingConsole::default();

        let outcome = poll(
            &[discovered(1)],
            &ci,
            &mut console,
            &sleeper,
            settings(true),
            Duration::from_secs(5),
        )
        .expect("poll");

        assert!(outcome.any_failure);
        assert_eq!(outcome.stop, StopReason::FailFast);
        assert_eq!(ci.view_calls().len(), 1);
        assert_eq!(sleeper.count(), 0);
        assert!(console.contains("  [FAIL] CI / test (failure)"));
        assert!(console.contains("Failure detected, exiting early"));
    }

    #[test]
    fn fail_fast_does_not_wait_for_other_runs() {
        let failing = run(
            "CI",
            "in_progress",
            "",
            vec![job(1, "test", "completed", "failure")],
        );
        let slow = run("Deploy", "in_progress", "", vec![job(2, "ship", "in_progress", "")]);
        let ci = ScriptedCi::new()
            .with_views(1, vec![Some(failing)])
            .with_views(2, vec![Some(slow)]);
        let sleeper = RecordingSleeper::default();
        let mut console = RecordingConsole::default();

        let outcome = poll(
            &[discovered(1), discovered(2)],
            &ci,
            &mut console,
            &sleeper,
            settings(true),
            Duration::from_secs(5),
        )
        .expect("poll");

        assert_eq!(outcome.stop, StopReason::FailFast);
        assert!(outcome.any_failure);
        assert_eq!(ci.view_calls(), vec![RunId(1), RunId(2)]);
        assert_eq!(sleeper.count(), 0);
        assert_eq!(
            console.blocks(),
            vec![vec![
                "Progress: 1/2 (50%)",
                "  [FAIL] CI / test (failure)",
                "  [RUN] Deploy / ship",
            ]]
        );
    }

    #[test]
    fn keep_going_waits_and_remembers_failure() {
        let first = run(
            "CI",
            "in_progress",
            "",
            vec![
                job(1, "build", "completed", "failure"),
                job(2, "test", "in_progress", ""),
            ],
        );
        let second = run(
            "CI",
            "completed",
            "failure",
            vec![
                job(1, "build", "completed", "failure"),
                job(2, "test", "completed", "success"),
            ],
        );
        let ci = ScriptedCi::new().with_views(1, vec![Some(first), Some(second)]);
        let sleeper = RecordingSleeper::default();
        let mut console = RecordingConsole::default();

        let outcome = poll(
            &[discovered(1)],
            &ci,
            &mut console,
            &sleeper,
            settings(false),
            Duration::from_secs(5),
        )
        .expect("poll");

        assert!(outcome.any_failure);
        assert_eq!(outcome.stop, StopReason::AllComplete);
        assert_eq!(sleeper.count(), 1);
        assert!(console.contains("Progress: 2/2 (100%)"));
        assert!(!console.contains("exiting early"));
    }

    #[test]
    fn unavailable_run_contributes_no_jobs() {
        let done = run(
            "CI",
            "completed",
            "success",
            vec![job(1, "build", "completed", "success")],
        );
        let ci = ScriptedCi::new().with_views(1, vec![None, Some(done)]);
        let sleeper = RecordingSleeper::default();
        let mut console = RecordingConsole::default();

        let outcome = poll(
            &[discovered(1)],
            &ci,
            &mut console,
            &sleeper,
            settings(true),
            Duration::from_secs(1),
        )
        .expect("poll");

        assert!(!outcome.any_failure);
        assert_eq!(
            console.blocks(),
            vec![
                vec!["Progress: 0/0 (0%)"],
                vec!["Progress: 1/1 (100%)", "  [OK] CI / build"],
            ]
        );
        assert_eq!(console.clears(), vec![1]);
    }
}
