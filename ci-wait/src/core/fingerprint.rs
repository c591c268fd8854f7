//! Change detection and progress counting across all monitored jobs.

use crate::core::types::{JobSnapshot, RunId};

/// Ordered summary of every observed job's state.
///
/// Two fingerprints are equal iff no job's (status, conclusion) pair changed
/// and no job was added or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fingerprint(Vec<FingerprintEntry>);

#[derive(Debug, Clone, PartialEq, Eq)]
struct FingerprintEntry {
    run: RunId,
    job: String,
    status: String,
    conclusion: String,
}

impl Fingerprint {
    pub fn push(&mut self, run: RunId, job: &JobSnapshot) {
        self.0.push(FingerprintEntry {
            run,
            job: job.name.clone(),
            status: job.status.as_str().to_string(),
            conclusion: job.conclusion.as_str().to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Completed vs. total job counts for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn record(&mut self, job: &JobSnapshot) {
        self.total += 1;
        if job.status.is_completed() {
            self.completed += 1;
        }
    }

    /// Truncated percentage; zero when nothing has been observed.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        self.completed * 100 / self.total
    }

    pub fn header(&self) -> String {
        format!(
            "Progress: {}/{} ({}%)",
            self.completed,
            self.total,
            self.percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Conclusion, Status};

    fn job(name: &str, status: Status, conclusion: Conclusion) -> JobSnapshot {
        JobSnapshot {
            id: 1,
            name: name.to_string(),
            status,
            conclusion,
        }
    }

    #[test]
    fn percent_truncates() {
        let progress = Progress {
            completed: 1,
            total: 3,
        };
        assert_eq!(progress.percent(), 33);
        let progress = Progress {
            completed: 2,
            total: 3,
        };
        assert_eq!(progress.percent(), 66);
    }

    #[test]
    fn percent_is_zero_without_jobs() {
        assert_eq!(Progress::default().percent(), 0);
        assert_eq!(Progress::default().header(), "Progress: 0/0 (0%)");
    }

    #[test]
    fn header_for_all_complete() {
        let mut progress = Progress::default();
        progress.record(&job("a", Status::Completed, Conclusion::Success));
        progress.record(&job("b", Status::Completed, Conclusion::Success));
        assert_eq!(progress.header(), "Progress: 2/2 (100%)");
    }

    #[test]
    fn fingerprint_changes_on_status_change_only() {
        let mut before = Fingerprint::default();
        before.push(RunId(1), &job("a", Status::InProgress, Conclusion::Pending));
        let mut same = Fingerprint::default();
        same.push(RunId(1), &job("a", Status::InProgress, Conclusion::Pending));
        assert_eq!(before, same);

        let mut after = Fingerprint::default();
        after.push(RunId(1), &job("a", Status::Completed, Conclusion::Success));
        assert_ne!(before, after);
    }

    #[test]
    fn fingerprint_changes_when_job_added() {
        let mut before = Fingerprint::default();
        before.push(RunId(1), &job("a", Status::Queued, Conclusion::Pending));
        let mut after = before.clone();
        after.push(RunId(1), &job("b", Status::Queued, Conclusion::Pending));
        assert_ne!(before, after);
        assert_eq!(after.len(), 2);
    }
}
