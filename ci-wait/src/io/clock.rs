//! Blocking pauses between polls and discovery attempts.

use std::thread;
use std::time::Duration;

use tracing::trace;

/// Abstraction over sleeping so loops can be driven without real delays.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread.
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        trace!(millis = duration.as_millis() as u64, "sleeping");
        thread::sleep(duration);
    }
}
