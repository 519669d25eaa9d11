//! Blum Drop - a timed clicker arcade game
//!
//! Core modules:
//! - `sim`: Time-driven simulation (cycle timers, entities, population, match)
//! - `hud`: Score and timer label state
//! - `assets`: Immutable asset bundle built from a loader collaborator
//! - `render`: Draw-command vocabulary consumed by the renderer collaborator
//! - `clock`: Millisecond clock abstraction
//! - `settings`: Data-driven game tuning

pub mod assets;
pub mod clock;
pub mod hud;
pub mod render;
pub mod settings;
pub mod sim;

pub use assets::{AssetBundle, AssetError, AssetLoader, NullLoader};
pub use clock::{Clock, ManualClock, SystemClock};
pub use settings::{Settings, SettingsError};
pub use sim::{MatchController, MatchSummary};

/// Milliseconds since the start of a play session
pub type Millis = u64;

/// Game configuration constants
pub mod consts {
    /// Board dimensions (portrait window)
    pub const BOARD_WIDTH: f32 = 402.0;
    pub const BOARD_HEIGHT: f32 = 712.0;
    /// Entities may live this far above the board top (they enter from above)
    pub const BOARD_TOP_MARGIN: f32 = 100.0;

    /// Match length (45 seconds)
    pub const MATCH_TIME_MS: u64 = 45_000;
    /// Freeze length after an ice hit (2 seconds)
    pub const FREEZE_TIME_MS: u64 = 2_000;

    /// Spawn rolls are drawn from [0, SPAWN_ROLL_RANGE)
    pub const SPAWN_ROLL_RANGE: u32 = 1000;
    pub const BLUM_SPAWN_WEIGHT: u32 = 60;
    pub const ICE_SPAWN_WEIGHT: u32 = 2;
    pub const BOMB_SPAWN_WEIGHT: u32 = 2;

    /// Entity size range (square side, pixels)
    pub const ENTITY_MIN_SIZE: f32 = 26.0;
    pub const ENTITY_MAX_SIZE: f32 = 45.0;
    /// Entity fall speed range (pixels/s)
    pub const ENTITY_MIN_SPEED: f32 = 100.0;
    pub const ENTITY_MAX_SPEED: f32 = 150.0;

    /// Score effects
    pub const BLUM_REWARD: u64 = 1;
    pub const BOMB_PENALTY: u64 = 100;

    /// Feedback indicators rise and fade at constant rates
    pub const FEEDBACK_RISE_SPEED: f32 = 20.0; // pixels/s
    pub const FEEDBACK_FADE_SPEED: f32 = 100.0; // alpha units/s
    pub const FEEDBACK_FONT_SIZE: u32 = 32;

    /// HUD
    pub const HUD_FONT_SIZE: u32 = 35;
    pub const HUD_MARGIN: f32 = 15.0;
    pub const TIMER_TEXT_OFFSET: f32 = 35.0;
    pub const TIMER_BADGE_WIDTH: f32 = 136.0;
    pub const TIMER_BADGE_HEIGHT: f32 = 46.0;
    /// Score label grows for this long after the score changes
    pub const SCORE_GROW_TIME_MS: u64 = 500;
    pub const SCORE_GROW_PER_SEC: f32 = 0.5;
    /// Score label stays red this long after a bomb
    pub const SCORE_BOOM_TIME_MS: u64 = 500;
    /// Timer label stays icy this long after a freeze
    pub const TIMER_ICE_TIME_MS: u64 = 2_000;
}

/// Format whole seconds as `MM:SS` (negative values clamp to zero)
pub fn format_clock(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
