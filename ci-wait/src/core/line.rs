//! Terminal-independent output lines.
//!
//! Core logic describes what to print as [`Line`]s; the terminal adapter
//! decides colors and whether icons render as emoji or ASCII.

use crate::core::types::{Conclusion, JobSnapshot, Status};

/// Semantic color of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Info,
    Success,
    Warn,
    /// Red text on stdout.
    Failure,
    /// Reported on stderr with an `ERROR:` prefix.
    Error,
}

/// Status glyph shown in front of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Pass,
    Fail,
    Skip,
    Running,
    Pending,
}

impl Icon {
    pub fn emoji(self) -> &'static str {
        match self {
            Icon::Pass => "✅ ",
            Icon::Fail => "❌ ",
            Icon::Skip => "⏭️  ",
            Icon::Running => "🔄 ",
            Icon::Pending => "⏳ ",
        }
    }

    pub fn fallback(self) -> &'static str {
        match self {
            Icon::Pass => "[OK] ",
            Icon::Fail => "[FAIL] ",
            Icon::Skip => "[SKIP] ",
            Icon::Running => "[RUN] ",
            Icon::Pending => "[WAIT] ",
        }
    }
}

/// One line of product output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub tone: Tone,
    pub indent: usize,
    pub icon: Option<Icon>,
    pub text: String,
}

impl Line {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            indent: 0,
            icon: None,
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(Tone::Plain, text)
    }

    pub fn blank() -> Self {
        Self::plain("")
    }

    pub fn indented(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Render without color, using ASCII icon fallbacks.
    pub fn to_plain(&self) -> String {
        let icon = self.icon.map(Icon::fallback).unwrap_or_default();
        format!("{:indent$}{icon}{}", "", self.text, indent = self.indent)
    }
}

/// The six mutually exclusive ways a job renders while polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Succeeded,
    Skipped,
    /// Completed with any other conclusion (kept for display).
    Failed(String),
    InProgress,
    Queued,
    /// Any status outside the known lifecycle (kept for display).
    Other(String),
}

impl JobState {
    pub fn of(job: &JobSnapshot) -> Self {
        match (&job.status, &job.conclusion) {
            (Status::Completed, Conclusion::Success) => JobState::Succeeded,
            (Status::Completed, Conclusion::Skipped) => JobState::Skipped,
            (Status::Completed, other) => JobState::Failed(other.as_str().to_string()),
            (Status::InProgress, _) => JobState::InProgress,
            (Status::Queued | Status::Waiting, _) => JobState::Queued,
            (other, _) => JobState::Other(other.as_str().to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, JobState::Failed(_))
    }

    /// Line shown for this job inside the progress block.
    pub fn line(&self, run_name: &str, job_name: &str) -> Line {
        let label = format!("{run_name} / {job_name}");
        let (icon, text) = match self {
            JobState::Succeeded => (Icon::Pass, label),
            JobState::Skipped => (Icon::Skip, format!("{label} (skipped)")),
            JobState::Failed(conclusion) => (Icon::Fail, format!("{label} ({conclusion})")),
            JobState::InProgress => (Icon::Running, label),
            JobState::Queued => (Icon::Pending, label),
            JobState::Other(status) => (Icon::Pending, format!("{label} ({status})")),
        };
        Line::plain(text).indented(2).with_icon(icon)
    }
}
