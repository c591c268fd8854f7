//! I/O adapters: child processes, git, gh, terminal, sleeping, configuration.

pub mod clock;
pub mod config;
pub mod gh;
pub mod git;
pub mod process;
pub mod terminal;
