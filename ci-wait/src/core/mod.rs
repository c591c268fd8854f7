//! Deterministic, pure logic for watching CI runs.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! snapshots and return deterministic outputs suitable for tests.

pub mod fingerprint;
pub mod line;
pub mod summary;
pub mod tick;
pub mod types;
