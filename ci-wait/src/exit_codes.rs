//! Stable exit codes for the `ci-wait` binary.

/// Every monitored run succeeded.
pub const OK: i32 = 0;
/// CI failure observed: fail-fast stop or a run that did not succeed.
pub const FAILED: i32 = 1;
/// Precondition, configuration, or discovery failure.
pub const INVALID: i32 = 2;
