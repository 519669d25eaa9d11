//! Millisecond clock abstraction
//!
//! The simulation never reads the system time itself. Callers sample a clock
//! once per frame and pass the timestamp into `update`/`draw`.

use std::cell::Cell;
use std::time::Instant;

use crate::Millis;

/// Source of monotonic, non-decreasing millisecond timestamps
pub trait Clock {
    fn now(&self) -> Millis;
}

/// Wall clock measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}

/// Clock advanced by hand (tests, headless runs)
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Millis>,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Move time forward by `delta` milliseconds
    pub fn advance(&self, delta: Millis) {
        self.now.set(self.now.get().saturating_add(delta));
    }

    /// Jump to `t`; earlier values are ignored so time never runs backwards
    pub fn set(&self, t: Millis) {
        if t > self.now.get() {
            self.now.set(t);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.now.get()
    }
}
