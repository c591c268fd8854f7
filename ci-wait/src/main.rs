//! Wait for GitHub Actions CI to finish for the current commit.
//!
//! Finds the workflow runs for `HEAD`, redraws a progress block as jobs
//! change state, then prints a pass/fail report with log commands for every
//! failing job.

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::debug;

use ci_wait::context::{LocalProbe, attach_pull_request, print_context, resolve_context};
use ci_wait::error::WaitError;
use ci_wait::exit_codes;
use ci_wait::io::clock::ThreadSleeper;
use ci_wait::io::config::{DEFAULT_CONFIG_FILE, WaitConfig, load_config};
use ci_wait::io::gh::GhCli;
use ci_wait::io::git::Git;
use ci_wait::io::terminal::{Console, TermConsole};
use ci_wait::logging;
use ci_wait::wait::{WaitOptions, run_wait};

#[derive(Parser)]
#[command(
    name = "ci-wait",
    version,
    about = "Wait for GitHub Actions CI to complete for the current commit"
)]
struct Cli {
    /// Watch this run id instead of searching by commit.
    run_id: Option<String>,

    /// Wait for all jobs instead of exiting on the first failure.
    #[arg(long)]
    keep_going: bool,

    /// TOML configuration file (default: `.ci-wait.toml` if present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let mut console = TermConsole::new();
    match run(cli, &mut console) {
        Ok(code) => process::exit(code),
        Err(err) => {
            if let Some(kind) = err.downcast_ref::<WaitError>() {
                debug!(?kind, "classified failure");
            }
            if console.error(&format!("{err:#}")).is_err() {
                eprintln!("ERROR: {err:#}");
            }
            process::exit(exit_codes::INVALID);
        }
    }
}

fn run<C: Console>(cli: Cli, console: &mut C) -> Result<i32> {
    let cfg = resolve_config(cli.config.as_deref())?;
    let workdir = env::current_dir().context("resolve current directory")?;
    let gh = GhCli::new(cfg.gh_program.clone(), cfg.command_timeout());
    let probe = LocalProbe {
        git: Git::new(workdir).with_timeout(cfg.command_timeout()),
        gh: gh.clone(),
    };

    let mut ctx = resolve_context(&probe, console)?;
    print_context(&ctx, console)?;
    attach_pull_request(&probe, &mut ctx);

    let opts = WaitOptions {
        run_id: cli.run_id,
        keep_going: cli.keep_going,
    };
    let outcome = run_wait(&ctx, &opts, &gh, console, &ThreadSleeper, &cfg)?;
    debug!(?outcome, "exiting");
    Ok(outcome.exit_code())
}

/// An explicit `--config` must exist; the default file is optional.
fn resolve_config(explicit: Option<&Path>) -> Result<WaitConfig> {
    match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("config file not found: {}", path.display());
            }
            load_config(path)
        }
        None => load_config(Path::new(DEFAULT_CONFIG_FILE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let cli = Cli::parse_from(["ci-wait"]);
        assert_eq!(cli.run_id, None);
        assert!(!cli.keep_going);
        assert_eq!(cli.config, None);
    }

    #[test]
    fn parse_run_id_and_flags() {
        let cli = Cli::parse_from(["ci-wait", "--keep-going", "12345", "--config", "ci.toml"]);
        assert_eq!(cli.run_id.as_deref(), Some("12345"));
        assert!(cli.keep_going);
        assert_eq!(cli.config, Some(PathBuf::from("ci.toml")));
    }

    #[test]
    fn parse_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["ci-wait", "--fail-fast"]).is_err());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = resolve_config(Some(&temp.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
