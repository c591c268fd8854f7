//! Wait for the GitHub Actions runs of the current commit to finish.
//!
//! The crate keeps a strict separation between decisions and effects:
//!
//! - **[`core`]**: Pure, deterministic logic (job classification, the poll
//!   tick fold, report layout). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (`git`, `gh`, the terminal,
//!   sleeping, config files). Each sits behind a trait so tests can script it.
//!
//! Orchestration modules ([`context`], [`discover`], [`poll`], [`report`],
//! [`wait`]) coordinate core logic with I/O to implement the CLI.

pub mod context;
pub mod core;
pub mod discover;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod poll;
pub mod report;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod wait;
