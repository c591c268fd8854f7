//! Helpers for running `git` and `gh` as child processes.

use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

use crate::error::WaitError;

/// Captured child process output.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub timed_out: bool,
}

impl CommandOutput {
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).trim().to_string()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Run a command, capturing stdout/stderr without risking pipe deadlocks.
///
/// With `timeout` set the child is killed once it elapses; with `None` the call
/// blocks until the child exits.
#[instrument(skip_all, fields(program = ?cmd.get_program(), timeout_secs = timeout.map(|t| t.as_secs())))]
pub fn run_command(mut cmd: Command, timeout: Option<Duration>) -> Result<CommandOutput> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!("spawning child process");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            return Err(e).context("spawn command");
        }
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    let stdout_handle = thread::spawn(move || read_stream(stdout));
    let stderr_handle = thread::spawn(move || read_stream(stderr));

    let mut timed_out = false;
    let status = match timeout {
        None => child.wait().context("wait for command")?,
        Some(limit) => match child.wait_timeout(limit).context("wait for command")? {
            Some(status) => status,
            None => {
                warn!(timeout_secs = limit.as_secs(), "command timed out, killing");
                timed_out = true;
                child.kill().context("kill command")?;
                child.wait().context("wait command after kill")?
            }
        },
    };

    let stdout = join_output(stdout_handle).context("join stdout")?;
    let stderr = join_output(stderr_handle).context("join stderr")?;

    debug!(exit_code = ?status.code(), timed_out, "command finished");
    Ok(CommandOutput {
        status,
        stdout,
        stderr,
        timed_out,
    })
}

/// Run `program args...` and return trimmed stdout, failing on spawn errors,
/// timeouts, and non-zero exits.
pub fn capture(program: &str, args: &[&str], timeout: Option<Duration>) -> Result<String> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    let command = format!("{program} {}", args.join(" "));
    let output = run_command(cmd, timeout).map_err(|err| WaitError::ExternalToolFailure {
        command: command.clone(),
        detail: format!("{err:#}"),
    })?;
    if output.timed_out {
        return Err(WaitError::ExternalToolFailure {
            command,
            detail: "timed out".to_string(),
        }
        .into());
    }
    if !output.status.success() {
        let stderr = output.stderr_text();
        let detail = if stderr.is_empty() {
            format!("exit status {:?}", output.status.code())
        } else {
            stderr
        };
        return Err(WaitError::ExternalToolFailure { command, detail }.into());
    }
    Ok(output.stdout_text())
}

fn join_output(handle: thread::JoinHandle<Result<Vec<u8>>>) -> Result<Vec<u8>> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}

fn read_stream<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).context("read output")?;
    Ok(buf)
}
