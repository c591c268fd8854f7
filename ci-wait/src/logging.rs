//! Diagnostic tracing, kept apart from what the user is waiting on.
//!
//! `ci-wait` writes two kinds of output:
//!
//! - **Product output**: context lines, the redrawn progress block, and the
//!   final report. It goes through [`crate::io::terminal::Console`], to stdout
//!   (errors to stderr with an `ERROR:` prefix), regardless of `RUST_LOG`.
//! - **Diagnostics (this module)**: `tracing` events for child processes,
//!   discovery attempts, failed run fetches, and poll decisions. Off below
//!   `warn` unless `RUST_LOG` asks for more.
//!
//! Diagnostics go to stderr and stay out of the stdout stream whose last
//! lines `Console::clear_last_block` erases.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr subscriber. Call once, before any output.
///
/// Filter comes from `RUST_LOG`, falling back to `warn`. Surfacing the
/// `gh`/`git` invocations and per-tick decisions:
///
/// ```bash
/// RUST_LOG=ci_wait=debug ci-wait --keep-going
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
