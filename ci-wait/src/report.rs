//! Print the final pass/fail report.

use anyhow::Result;
use tracing::{instrument, warn};

use crate::core::line::Line;
use crate::core::summary::{links, run_report};
use crate::core::types::{Context, DiscoveredRun};
use crate::error::WaitError;
use crate::io::gh::CiSource;
use crate::io::terminal::Console;

/// Fetch each run one last time and print its report.
///
/// Returns true when every run that could be fetched succeeded. Runs whose
/// detail cannot be fetched are reported and skipped.
#[instrument(skip_all, fields(runs = runs.len()))]
pub fn report<S: CiSource, C: Console>(
    runs: &[DiscoveredRun],
    ctx: &Context,
    source: &S,
    console: &mut C,
) -> Result<bool> {
    let mut all_passed = true;
    for run in runs {
        let snapshot = match source.view_run(run.id) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                let err = WaitError::RunDetailUnavailable {
                    run_id: run.id,
                    cause: format!("{err:#}"),
                };
                warn!(
                    err = %err,
                    name = run.name.as_deref().unwrap_or_default(),
                    "skipping run in report"
                );
                console.error(&format!("Could not get run details for {}", run.id))?;
                continue;
            }
        };
        let section = run_report(run.id, &snapshot);
        all_passed &= section.passed;
        print_lines(console, &section.lines)?;
    }
    print_lines(console, &links(ctx))?;
    Ok(all_passed)
}

fn print_lines<C: Console>(console: &mut C, lines: &[Line]) -> Result<()> {
    for line in lines {
        console.line(line)?;
    }
    Ok(())
}
