//! Optional configuration stored in `.ci-wait.toml`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::tick::UnreachableRunPolicy;

/// File looked up in the current directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = ".ci-wait.toml";

/// Watcher configuration (TOML).
///
/// Every field is optional in the file; missing fields take the defaults
/// below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WaitConfig {
    /// Seconds between poll ticks.
    pub poll_interval_secs: u64,

    /// How many times to look for runs before giving up.
    pub discovery_attempts: u32,

    /// Seconds between discovery attempts.
    pub discovery_interval_secs: u64,

    /// `--limit` passed to `gh run list`.
    pub run_list_limit: u32,

    /// Kill `gh`/`git` calls that take longer than this. Unset waits forever.
    pub command_timeout_secs: Option<u64>,

    /// Program invoked for CI queries.
    pub gh_program: String,

    /// How runs whose detail cannot be fetched affect termination.
    pub unreachable_runs: UnreachableRunPolicy,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
            discovery_attempts: 5,
            discovery_interval_secs: 5,
            run_list_limit: 10,
            command_timeout_secs: None,
            gh_program: "gh".to_string(),
            unreachable_runs: UnreachableRunPolicy::default(),
        }
    }
}

impl WaitConfig {
    pub fn validate(&self) -> Result<()> {
        if self.discovery_attempts == 0 {
            return Err(anyhow!("discovery_attempts must be > 0"));
        }
        if self.run_list_limit == 0 {
            return Err(anyhow!("run_list_limit must be > 0"));
        }
        if self.command_timeout_secs == Some(0) {
            return Err(anyhow!("command_timeout_secs must be > 0 when set"));
        }
        if self.gh_program.trim().is_empty() {
            return Err(anyhow!("gh_program must be non-empty"));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn discovery_interval(&self) -> Duration {
        Duration::from_secs(self.discovery_interval_secs)
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `WaitConfig::default()`.
pub fn load_config(path: &Path) -> Result<WaitConfig> {
    if !path.exists() {
        let cfg = WaitConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: WaitConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, WaitConfig::default());
        assert_eq!(cfg.poll_interval(), Duration::from_secs(5));
        assert_eq!(cfg.command_timeout(), None);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("ci-wait.toml");
        fs::write(
            &path,
            "poll_interval_secs = 10\nunreachable_runs = \"exclude\"\ncommand_timeout_secs = 30\n",
        )
        .expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.poll_interval_secs, 10);
        assert_eq!(cfg.unreachable_runs, UnreachableRunPolicy::Exclude);
        assert_eq!(cfg.command_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(cfg.discovery_attempts, 5);
        assert_eq!(cfg.gh_program, "gh");
    }

    #[test]
    fn rejects_zero_attempts() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("ci-wait.toml");
        fs::write(&path, "discovery_attempts = 0\n").expect("write");
        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("discovery_attempts"));
    }

    #[test]
    fn rejects_unknown_policy() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("ci-wait.toml");
        fs::write(&path, "unreachable_runs = \"ignore\"\n").expect("write");
        assert!(load_config(&path).is_err());
    }
}
