//! Resolve which workflow runs to monitor.

use anyhow::Result;
use tracing::{debug, info_span};

use crate::core::line::Line;
use crate::core::types::{Context, DiscoveredRun, RunId, RunSummary};
use crate::error::WaitError;
use crate::io::clock::Sleeper;
use crate::io::config::WaitConfig;
use crate::io::gh::CiSource;
use crate::io::terminal::Console;

/// Parse a user-supplied run id.
pub fn parse_run_id(raw: &str) -> Result<RunId, WaitError> {
    raw.trim()
        .parse::<u64>()
        .map(RunId)
        .map_err(|_| WaitError::InvalidRunId(raw.to_string()))
}

/// Return the runs to monitor, in the order the CI source lists them.
///
/// An explicit run id skips the search entirely. Otherwise the commit's runs
/// are listed up to `cfg.discovery_attempts` times.
pub fn discover<S, C, Z>(
    ctx: &Context,
    explicit: Option<&str>,
    source: &S,
    console: &mut C,
    sleeper: &Z,
    cfg: &WaitConfig,
) -> Result<Vec<DiscoveredRun>>
where
    S: CiSource,
    C: Console,
    Z: Sleeper,
{
    if let Some(raw) = explicit {
        let id = parse_run_id(raw)?;
        console.info(&format!("Watching specified run: {id}"))?;
        return Ok(vec![DiscoveredRun { id, name: None }]);
    }

    console.info(&format!(
        "Finding workflow runs for commit {}...",
        ctx.short_commit
    ))?;

    let runs = search(ctx, source, console, sleeper, cfg)?;
    if runs.is_empty() {
        return Err(WaitError::NoRunsFound {
            short_commit: ctx.short_commit.clone(),
        }
        .into());
    }

    console.info(&format!("Found {} workflow run(s):", runs.len()))?;
    for run in &runs {
        console.line(&Line::plain(format!("  {} {}", run.id, run.name)))?;
    }
    console.blank()?;

    Ok(runs
        .into_iter()
        .map(|run| DiscoveredRun {
            id: run.id,
            name: Some(run.name),
        })
        .collect())
}

fn search<S, C, Z>(
    ctx: &Context,
    source: &S,
    console: &mut C,
    sleeper: &Z,
    cfg: &WaitConfig,
) -> Result<Vec<RunSummary>>
where
    S: CiSource,
    C: Console,
    Z: Sleeper,
{
    let max = cfg.discovery_attempts;
    for attempt in 1..=max {
        let _span = info_span!("discovery_attempt", attempt, max).entered();
        match source.list_runs(&ctx.commit, cfg.run_list_limit) {
            Ok(runs) if !runs.is_empty() => {
                debug!(count = runs.len(), "runs found");
                return Ok(runs);
            }
            Ok(_) => debug!("no runs listed"),
            Err(err) => debug!(err = %format!("{err:#}"), "run listing failed"),
        }
        if attempt < max {
            console.warn(&format!(
                "No runs found yet, waiting {} seconds... (attempt {attempt}/{max})",
                cfg.discovery_interval_secs
            ))?;
            sleeper.sleep(cfg.discovery_interval());
        }
    }
    Ok(Vec::new())
}
