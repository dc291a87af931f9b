//! Coalescing timer state for the deferred store operations.
//!
//! Each deferred operation owns exactly one pending-timer state with a fixed
//! quiet window. The garbage collector uses trailing-edge coalescing
//! ([`Debounce`]): the sweep runs one window after the *last* scheduling
//! call. The refresh operations use leading-edge rate limiting
//! ([`Throttle`]): the first call outside an active window runs immediately,
//! calls inside the window coalesce into a single trailing execution.
//!
//! Neither type runs anything itself; the store's `tick` pump asks them what
//! is due against an injected clock, which keeps timing deterministic under
//! test.

use std::time::{Duration, Instant};

/// Trailing-edge coalescer: fires once, a fixed quiet period after the most
/// recent `schedule` call.
#[derive(Debug)]
pub(crate) struct Debounce {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub(crate) fn new(window: Duration) -> Self {
        Debounce {
            window,
            deadline: None,
        }
    }

    /// Arm (or push back) the deadline to `now + window`.
    pub(crate) fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// True exactly once, when the quiet period has elapsed.
    pub(crate) fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Leading-edge rate limiter with trailing coalescing.
///
/// `acquire` returns true when the caller should run right now (leading
/// edge); calls absorbed inside the window arm a single trailing execution
/// that `fire_trailing` reports once the window closes.
#[derive(Debug)]
pub(crate) struct Throttle {
    window: Duration,
    open_until: Option<Instant>,
    trailing: bool,
}

impl Throttle {
    pub(crate) fn new(window: Duration) -> Self {
        Throttle {
            window,
            open_until: None,
            trailing: false,
        }
    }

    /// Ask to run now. Opens a new window on success.
    pub(crate) fn acquire(&mut self, now: Instant) -> bool {
        match self.open_until {
            Some(until) if now < until => {
                self.trailing = true;
                false
            }
            _ => {
                self.open_until = Some(now + self.window);
                self.trailing = false;
                true
            }
        }
    }

    /// True exactly once per window that absorbed calls, after it closes.
    /// A trailing execution opens a fresh window.
    pub(crate) fn fire_trailing(&mut self, now: Instant) -> bool {
        match self.open_until {
            Some(until) if now >= until => {
                if self.trailing {
                    self.trailing = false;
                    self.open_until = Some(now + self.window);
                    true
                } else {
                    self.open_until = None;
                    false
                }
            }
            _ => false,
        }
    }
}
