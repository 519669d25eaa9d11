//! Match state
//!
//! The controller owns the population, the HUD and the match clock. Frozen
//! stretches are excluded from the clock as whole intervals, so a match lasts
//! `match_time_ms` of unfrozen play.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::entity::EntityKind;
use super::population::EntityPopulation;
use super::rect::Rect;
use crate::Millis;
use crate::assets::AssetBundle;
use crate::hud::{Backdrop, ScoreLabel, TimerLabel};
use crate::render::Canvas;
use crate::settings::{Settings, SettingsError};

/// Whether the board is frozen by an ice hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FreezeState {
    Running,
    /// `entered_at` starts the excluded interval; `restarted_at` is the most
    /// recent ice hit and decides when the freeze ends
    Frozen {
        entered_at: Millis,
        restarted_at: Millis,
    },
}

/// Per-match click tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Clicks that hit nothing
    pub miss: u32,
    pub blum: u32,
    pub ice: u32,
    pub bomb: u32,
}

impl Stats {
    pub fn record(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::Blum => self.blum += 1,
            EntityKind::Ice => self.ice += 1,
            EntityKind::Bomb => self.bomb += 1,
        }
    }

    pub fn hits(&self) -> u32 {
        self.blum + self.ice + self.bomb
    }
}

/// Gameplay events for the shell (sound, logging)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    Scored { cash: u64 },
    Exploded { cash: u64 },
    Frozen,
    Thawed,
    Missed,
    GameOver { cash: u64 },
}

/// End-of-match report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub seed: u64,
    pub cash: u64,
    /// Unfrozen play time
    pub elapsed_ms: Millis,
    pub frozen_ms: Millis,
    pub game_over: bool,
    pub stats: Stats,
}

/// One timed match
#[derive(Debug)]
pub struct MatchController {
    pub(super) assets: Arc<AssetBundle>,
    pub(super) population: EntityPopulation,
    pub(super) seed: u64,
    pub(super) match_time_ms: Millis,
    pub(super) freeze_time_ms: Millis,
    pub(super) cash: u64,
    pub(super) stats: Stats,
    pub(super) started_at: Option<Millis>,
    /// Time of the most recent update; a click-triggered freeze starts here
    pub(super) last_update: Millis,
    pub(super) elapsed_ms: Millis,
    /// Sum of finished freeze intervals
    pub(super) frozen_total_ms: Millis,
    pub(super) freeze: FreezeState,
    /// Set by an ice hit; the clock side of the freeze is applied on the next update
    pub(super) freeze_requested: bool,
    pub(super) over_reported: bool,
    pub(super) events: Vec<MatchEvent>,
    pub(super) score_label: ScoreLabel,
    pub(super) timer_label: TimerLabel,
    pub(super) backdrop: Backdrop,
}

impl MatchController {
    /// Fresh match; the clock starts on the first `update`
    pub fn new(assets: Arc<AssetBundle>, settings: &Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(rand::random);
        let board = settings.board();
        log::info!("New match (seed {seed}, {} ms)", settings.match_time_ms);

        Ok(Self {
            population: EntityPopulation::new(Arc::clone(&assets), settings, seed),
            seed,
            match_time_ms: settings.match_time_ms,
            freeze_time_ms: settings.freeze_time_ms,
            cash: 0,
            stats: Stats::default(),
            started_at: None,
            last_update: 0,
            elapsed_ms: 0,
            frozen_total_ms: 0,
            freeze: FreezeState::Running,
            freeze_requested: false,
            over_reported: false,
            events: Vec::new(),
            score_label: ScoreLabel::new(board),
            timer_label: TimerLabel::new(board),
            backdrop: Backdrop::new(&assets, board),
            assets,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn board(&self) -> Rect {
        self.population.board()
    }

    pub fn cash(&self) -> u64 {
        self.cash
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn freeze_state(&self) -> FreezeState {
        self.freeze
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self.freeze, FreezeState::Frozen { .. })
    }

    /// Unfrozen time since the first update
    pub fn elapsed_ms(&self) -> Millis {
        self.elapsed_ms
    }

    /// Whole seconds left on the countdown; negative once the match is over
    pub fn seconds_left(&self) -> i64 {
        (self.match_time_ms / 1000) as i64 - (self.elapsed_ms / 1000) as i64
    }

    pub fn is_game_over(&self) -> bool {
        self.elapsed_ms > self.match_time_ms
    }

    pub fn population(&self) -> &EntityPopulation {
        &self.population
    }

    /// Direct access for scripted scenarios
    pub fn population_mut(&mut self) -> &mut EntityPopulation {
        &mut self.population
    }

    pub fn assets(&self) -> &AssetBundle {
        &self.assets
    }

    pub fn score_label(&self) -> &ScoreLabel {
        &self.score_label
    }

    pub fn timer_label(&self) -> &TimerLabel {
        &self.timer_label
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn summary(&self) -> MatchSummary {
        let frozen_ms = match self.freeze {
            FreezeState::Frozen { entered_at, .. } => {
                self.frozen_total_ms + self.last_update.saturating_sub(entered_at)
            }
            FreezeState::Running => self.frozen_total_ms,
        };
        MatchSummary {
            seed: self.seed,
            cash: self.cash,
            elapsed_ms: self.elapsed_ms,
            frozen_ms,
            game_over: self.is_game_over(),
            stats: self.stats,
        }
    }

    /// Emit one frame, back to front: background, entities and feedback,
    /// frozen overlay, then the two labels
    pub fn draw(&mut self, now: Millis, canvas: &mut dyn Canvas) {
        self.backdrop.step(now);
        self.score_label.observe(now);
        self.timer_label.observe(now);

        self.backdrop.draw_background(canvas);
        self.population.draw(canvas);
        self.backdrop.draw_overlay(canvas);
        self.score_label.draw(&self.assets, canvas);
        self.timer_label.draw(&self.assets, canvas);
    }
}
