//! Final pass/fail report layout.

use crate::core::line::{Icon, Line, Tone};
use crate::core::types::{Conclusion, Context, RunId, RunSnapshot};

const RULE_WIDTH: usize = 64;

/// Command that prints one job's log.
pub fn job_log_command(job_id: u64) -> String {
    format!("gh run view --log --job {job_id}")
}

/// Command that prints the logs of every failed job in a run.
pub fn failed_logs_command(run: RunId) -> String {
    format!("gh run view {run} --log-failed")
}

/// Report section for one fetched run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub passed: bool,
    pub lines: Vec<Line>,
}

pub fn run_report(run: RunId, snapshot: &RunSnapshot) -> RunReport {
    let passed = snapshot.succeeded();
    let rule = "═".repeat(RULE_WIDTH);
    let mut lines = vec![Line::plain(rule.clone())];
    lines.push(if passed {
        Line::new(Tone::Success, format!("{} PASSED", snapshot.name)).with_icon(Icon::Pass)
    } else {
        Line::new(Tone::Failure, format!("{} FAILED", snapshot.name)).with_icon(Icon::Fail)
    });
    lines.push(Line::plain(rule));
    lines.push(Line::blank());

    lines.push(Line::new(Tone::Info, "Jobs:"));
    for job in &snapshot.jobs {
        let icon = match job.conclusion {
            Conclusion::Success => Icon::Pass,
            Conclusion::Failure => Icon::Fail,
            Conclusion::Skipped => Icon::Skip,
            _ => Icon::Pending,
        };
        let text = if job.is_failing() {
            format!("{}  →  {}", job.name, job_log_command(job.id))
        } else {
            job.name.clone()
        };
        lines.push(Line::plain(text).indented(2).with_icon(icon));
    }
    lines.push(Line::blank());
    lines.push(Line::plain(format!("     Run:  {}", snapshot.url)));

    if !passed {
        lines.push(Line::blank());
        lines.push(Line::new(Tone::Warn, "View all failed logs:"));
        lines.push(Line::plain(failed_logs_command(run)).indented(2));
        lines.push(Line::blank());
    }

    RunReport { passed, lines }
}

/// Trailing links to the commit and, when known, the pull request.
pub fn links(ctx: &Context) -> Vec<Line> {
    let mut lines = vec![
        Line::new(Tone::Info, "Links:"),
        Line::plain(format!("  Commit:  {}", ctx.commit_url)),
    ];
    if let Some(pr) = &ctx.pull_request {
        lines.push(Line::plain(format!("      PR:  {}", pr.url)));
    }
    lines.push(Line::blank());
    lines
}
