//! Falling, clickable entities
//!
//! Blum, Ice and Bomb share one shape: a rectangle moving at constant
//! velocity with three sprite timers. The kind tag only matters to the match
//! controller, which decides what a hit is worth.
//!
//! Lifecycle:
//! - `Idle`: idle strip at the rectangle, glow strip half a height above it
//! - `Activated`: first successful press; only the activation strip plays
//! - `Dead`: the activation strip finished one pass; no longer drawn

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::cycle::CycleTimer;
use super::rect::Rect;
use crate::Millis;
use crate::assets::{EntityVisuals, SpriteSheet, TextureId};
use crate::render::{Canvas, DrawCommand};

/// Entity categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Worth one point
    Blum,
    /// Freezes the board and the match clock
    Ice,
    /// Costs points and flashes the screen
    Bomb,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Blum, EntityKind::Ice, EntityKind::Bomb];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Blum => "blum",
            EntityKind::Ice => "ice",
            EntityKind::Bomb => "bomb",
        }
    }
}

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityPhase {
    Idle,
    Activated,
    Dead,
}

/// Sprite strip paired with its running timer
#[derive(Debug, Clone)]
struct Strip {
    texture: TextureId,
    timer: CycleTimer,
}

impl Strip {
    fn new(sheet: &SpriteSheet) -> Self {
        Self {
            texture: sheet.texture,
            timer: sheet.timer(),
        }
    }

    fn command(&self, rect: Rect) -> DrawCommand {
        DrawCommand::Sprite {
            texture: self.texture,
            frame: self.timer.index(),
            frames: self.timer.frame_count(),
            rect,
        }
    }
}

/// A timed falling object
#[derive(Debug, Clone)]
pub struct TimedEntity {
    kind: EntityKind,
    pos: Vec2,
    size: Vec2,
    /// Unit vector or zero
    direction: Vec2,
    /// Pixels per second
    speed: f32,
    last_move: Option<Millis>,
    alive: bool,
    activated: bool,
    glow: Strip,
    activation: Strip,
    idle: Strip,
}

impl TimedEntity {
    /// Stationary entity at the origin; the spawner places it
    pub fn new(kind: EntityKind, visuals: &EntityVisuals) -> Self {
        Self {
            kind,
            pos: Vec2::ZERO,
            size: Vec2::ZERO,
            direction: Vec2::ZERO,
            speed: 0.0,
            last_move: None,
            alive: true,
            activated: false,
            glow: Strip::new(&visuals.glow),
            activation: Strip::new(&visuals.activation),
            idle: Strip::new(&visuals.idle),
        }
    }

    #[inline]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn phase(&self) -> EntityPhase {
        match (self.alive, self.activated) {
            (false, _) => EntityPhase::Dead,
            (true, true) => EntityPhase::Activated,
            (true, false) => EntityPhase::Idle,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    /// Normalizes `direction`; a zero vector stops the entity
    pub fn set_direction(&mut self, direction: Vec2) {
        self.direction = direction.normalize_or_zero();
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Point-in-rectangle test against the current position
    pub fn contains(&self, point: Vec2) -> bool {
        self.rect().contains(point)
    }

    /// Activate on the first hit; later hits are ignored
    pub fn try_press(&mut self, point: Vec2) -> bool {
        if self.activated || !self.contains(point) {
            return false;
        }
        self.activation.timer.start();
        self.activated = true;
        true
    }

    /// Integrate position since the previous call; the first call only
    /// records the time baseline
    pub fn move_to(&mut self, now: Millis) -> Vec2 {
        let Some(last) = self.last_move.replace(now) else {
            return self.pos;
        };
        let dt = now.saturating_sub(last) as f32 / 1000.0;
        self.pos += self.direction * self.speed * dt;
        self.pos
    }

    /// Move, step the visible strips, and die once activation has played out
    pub fn advance(&mut self, now: Millis) {
        self.move_to(now);
        if !self.alive {
            return;
        }
        if self.activated {
            if self.activation.timer.is_end(now) {
                self.alive = false;
                return;
            }
            self.activation.timer.current_index(now);
        } else {
            self.idle.timer.current_index(now);
            self.glow.timer.current_index(now);
        }
    }

    /// Emit draw commands for the current frame
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let rect = self.rect();
        match self.phase() {
            EntityPhase::Dead => {}
            EntityPhase::Activated => canvas.draw(self.activation.command(rect)),
            EntityPhase::Idle => {
                canvas.draw(self.idle.command(rect));
                let glow_rect = Rect::from_pos_size(
                    Vec2::new(rect.left(), rect.top() - rect.size.y / 2.0),
                    rect.size,
                );
                canvas.draw(self.glow.command(glow_rect));
            }
        }
    }
}
