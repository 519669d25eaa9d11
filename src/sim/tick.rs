//! Match tick
//!
//! Clicks are applied as they arrive; `update` then advances the freeze, the
//! population and the match clock to `now`.

use glam::Vec2;

use super::entity::EntityKind;
use super::population::Hit;
use super::state::{FreezeState, MatchController, MatchEvent};
use crate::Millis;
use crate::consts::*;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub now: Millis,
    /// Clicks since the previous frame, in board coordinates
    pub clicks: Vec<Vec2>,
}

/// Apply a frame of input, then advance the match
pub fn tick(game: &mut MatchController, input: &TickInput) {
    for &point in &input.clicks {
        game.click(point);
    }
    game.update(input.now);
}

impl MatchController {
    /// Handle a click at `point`. Every entity under it is hit.
    pub fn click(&mut self, point: Vec2) {
        let hits = self.population.press(point);
        if hits.is_empty() {
            self.stats.miss += 1;
            self.events.push(MatchEvent::Missed);
            return;
        }
        for hit in hits {
            self.apply_hit(hit);
        }
    }

    fn apply_hit(&mut self, hit: Hit) {
        self.stats.record(hit.kind);
        match hit.kind {
            EntityKind::Blum => {
                self.cash += BLUM_REWARD;
                self.population.push_feedback(hit.rect, BLUM_REWARD as i64);
                self.events.push(MatchEvent::Scored { cash: self.cash });
            }
            EntityKind::Ice => {
                // Movement and spawning stop now; the clock catches up in `update`
                self.population.freeze();
                self.freeze_requested = true;
                self.timer_label.ice();
                self.backdrop.frozen.trigger();
                self.population.push_feedback(hit.rect, 0);
                self.events.push(MatchEvent::Frozen);
            }
            EntityKind::Bomb => {
                self.cash = self.cash.saturating_sub(BOMB_PENALTY);
                self.score_label.boom();
                self.backdrop.boom.trigger();
                self.population.push_feedback(hit.rect, -(BOMB_PENALTY as i64));
                self.events.push(MatchEvent::Exploded { cash: self.cash });
            }
        }
    }

    /// Advance the match to `now`
    pub fn update(&mut self, now: Millis) {
        let start = *self.started_at.get_or_insert_with(|| {
            log::info!("Match started at {now} ms");
            now
        });

        // A thaw applies after the step, so entities stay put for all of it
        self.population.spawn();
        self.population.advance(now);
        self.population.reap();

        self.update_freeze(now, start);
        self.last_update = now;

        let frozen_now = match self.freeze {
            FreezeState::Frozen { entered_at, .. } => now.saturating_sub(entered_at),
            FreezeState::Running => 0,
        };
        self.elapsed_ms = now
            .saturating_sub(start)
            .saturating_sub(self.frozen_total_ms + frozen_now);

        self.score_label.set_score(self.cash);
        self.timer_label.set_seconds(self.seconds_left());

        if self.is_game_over() && !self.over_reported {
            self.over_reported = true;
            log::info!(
                "Match over: cash {}, {} hits, {} misses",
                self.cash,
                self.stats.hits(),
                self.stats.miss
            );
            self.events.push(MatchEvent::GameOver { cash: self.cash });
        }
    }

    /// Resolve pending ice hits and expire the freeze. A freeze entered by a
    /// click covers the whole step that contained the click.
    fn update_freeze(&mut self, now: Millis, start: Millis) {
        if std::mem::take(&mut self.freeze_requested) {
            self.freeze = match self.freeze {
                FreezeState::Running => {
                    let entered_at = self.last_update.max(start);
                    log::info!("Board frozen at {entered_at} ms");
                    FreezeState::Frozen {
                        entered_at,
                        restarted_at: now,
                    }
                }
                FreezeState::Frozen { entered_at, .. } => {
                    log::debug!("Freeze extended at {now} ms");
                    FreezeState::Frozen {
                        entered_at,
                        restarted_at: now,
                    }
                }
            };
        }

        if let FreezeState::Frozen {
            entered_at,
            restarted_at,
        } = self.freeze
            && now.saturating_sub(restarted_at) >= self.freeze_time_ms
        {
            let frozen = now.saturating_sub(entered_at);
            self.frozen_total_ms += frozen;
            self.freeze = FreezeState::Running;
            self.population.unfreeze();
            self.backdrop.frozen.cancel();
            self.events.push(MatchEvent::Thawed);
            log::info!("Board thawed after {frozen} ms");
        }
    }
}
