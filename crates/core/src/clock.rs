//! Time source abstraction for the coalesced schedulers.
//!
//! The garbage collector and refresh scheduler measure quiet windows against
//! a [`Clock`] rather than calling [`Instant::now`] directly, so tests can
//! drive timing-sensitive behavior deterministically with a [`ManualClock`].

use std::fmt::Debug;
use std::time::Instant;

#[cfg(any(test, feature = "testing"))]
use std::time::Duration;

/// A monotonic time source.
pub trait Clock: Send + Sync + Debug {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Production clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for tests.
///
/// Starts at the instant of construction and only moves when told to.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug)]
pub struct ManualClock {
    now: parking_lot::Mutex<Instant>,
}

#[cfg(any(test, feature = "testing"))]
impl ManualClock {
    /// Create a clock frozen at the current instant.
    pub fn new() -> Self {
        ManualClock {
            now: parking_lot::Mutex::new(Instant::now()),
        }
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock();
        *now += delta;
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "testing"))]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}
