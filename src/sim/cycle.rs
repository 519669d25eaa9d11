//! Frame-index-over-time calculator
//!
//! A `CycleTimer` answers "which of N frames is active right now" for any
//! timestamp stream. It drives every sprite animation and the one-shot
//! activation sequences that decide when an entity dies.
//!
//! Callers must feed non-decreasing timestamps to one timer after `start()`.
//! A timestamp earlier than the last transition counts as zero elapsed time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Millis;

/// Invalid timer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// A timer needs at least one frame
    ZeroFrames,
    /// Frames must change after a positive interval
    ZeroInterval,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::ZeroFrames => write!(f, "cycle timer needs at least one frame"),
            TimerError::ZeroInterval => write!(f, "cycle timer interval must be positive"),
        }
    }
}

impl std::error::Error for TimerError {}

/// Looping frame counter advanced by elapsed time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleTimer {
    frame_count: usize,
    interval_ms: Millis,
    index: usize,
    /// Time of the last frame change, `None` until the first query
    last_transition: Option<Millis>,
}

impl CycleTimer {
    pub fn new(frame_count: usize, interval_ms: Millis) -> Result<Self, TimerError> {
        if frame_count == 0 {
            return Err(TimerError::ZeroFrames);
        }
        if interval_ms == 0 {
            return Err(TimerError::ZeroInterval);
        }
        Ok(Self {
            frame_count,
            interval_ms,
            index: 0,
            last_transition: None,
        })
    }

    /// Restart from frame 0; the next query re-baselines the clock
    pub fn start(&mut self) {
        self.index = 0;
        self.last_transition = None;
    }

    /// Active frame at `now`, stepping forward one frame if the interval elapsed
    pub fn current_index(&mut self, now: Millis) -> usize {
        if self.due(now) {
            self.index = (self.index + 1) % self.frame_count;
            self.last_transition = Some(now);
        }
        if self.last_transition.is_none() {
            self.last_transition = Some(now);
        }
        self.index
    }

    /// True iff advancing at `now` would wrap back to frame 0
    pub fn is_end(&self, now: Millis) -> bool {
        self.due(now) && (self.index + 1) % self.frame_count == 0
    }

    /// Frame selected by the most recent query
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    #[inline]
    pub fn interval_ms(&self) -> Millis {
        self.interval_ms
    }

    fn due(&self, now: Millis) -> bool {
        match self.last_transition {
            Some(last) => now.saturating_sub(last) >= self.interval_ms,
            None => false,
        }
    }
}
