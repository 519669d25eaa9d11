//! Time-driven simulation
//!
//! All gameplay logic lives here. Every operation takes the current time in
//! milliseconds from the caller, and randomness comes from a seeded RNG, so a
//! match replays exactly given the same seed, clicks and timestamps.

pub mod cycle;
pub mod entity;
pub mod feedback;
pub mod population;
pub mod rect;
pub mod state;
pub mod tick;

pub use cycle::{CycleTimer, TimerError};
pub use entity::{EntityKind, EntityPhase, TimedEntity};
pub use feedback::FloatingFeedback;
pub use population::{EntityPopulation, Hit};
pub use rect::Rect;
pub use state::{FreezeState, MatchController, MatchEvent, MatchSummary, Stats};
pub use tick::{TickInput, tick};
