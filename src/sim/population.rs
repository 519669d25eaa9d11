//! Entity population
//!
//! Owns every live entity and feedback indicator. Each tick runs in a fixed
//! order: spawn, advance, reap. Removal always goes through `retain`, so a
//! collection is never mutated while something is iterating over it.

use std::ops::RangeInclusive;
use std::sync::Arc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{EntityKind, TimedEntity};
use super::feedback::FloatingFeedback;
use super::rect::Rect;
use crate::Millis;
use crate::assets::AssetBundle;
use crate::consts::{BOARD_TOP_MARGIN, SPAWN_ROLL_RANGE};
use crate::render::Canvas;
use crate::settings::{Settings, SpawnWeights};

/// Falling direction
pub const DOWN: Vec2 = Vec2::new(0.0, 1.0);

/// One entity that registered a press
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub kind: EntityKind,
    /// Where the entity was when it was pressed
    pub rect: Rect,
}

/// Every entity on the board plus the floating feedback
#[derive(Debug)]
pub struct EntityPopulation {
    assets: Arc<AssetBundle>,
    board: Rect,
    weights: SpawnWeights,
    size_range: RangeInclusive<f32>,
    speed_range: RangeInclusive<f32>,
    rng: Pcg32,
    blums: Vec<TimedEntity>,
    ices: Vec<TimedEntity>,
    bombs: Vec<TimedEntity>,
    feedback: Vec<FloatingFeedback>,
    frozen: bool,
}

impl EntityPopulation {
    pub fn new(assets: Arc<AssetBundle>, settings: &Settings, seed: u64) -> Self {
        Self {
            assets,
            board: settings.board(),
            weights: settings.spawn_weights,
            size_range: settings.size_range(),
            speed_range: settings.speed_range(),
            rng: Pcg32::seed_from_u64(seed),
            blums: Vec::new(),
            ices: Vec::new(),
            bombs: Vec::new(),
            feedback: Vec::new(),
            frozen: false,
        }
    }

    pub fn board(&self) -> Rect {
        self.board
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn entities(&self, kind: EntityKind) -> &[TimedEntity] {
        match kind {
            EntityKind::Blum => &self.blums,
            EntityKind::Ice => &self.ices,
            EntityKind::Bomb => &self.bombs,
        }
    }

    fn entities_mut(&mut self, kind: EntityKind) -> &mut Vec<TimedEntity> {
        match kind {
            EntityKind::Blum => &mut self.blums,
            EntityKind::Ice => &mut self.ices,
            EntityKind::Bomb => &mut self.bombs,
        }
    }

    /// All entities, blums first, then ices, then bombs
    pub fn iter(&self) -> impl Iterator<Item = &TimedEntity> {
        self.blums.iter().chain(&self.ices).chain(&self.bombs)
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut TimedEntity> {
        self.blums
            .iter_mut()
            .chain(self.ices.iter_mut())
            .chain(self.bombs.iter_mut())
    }

    pub fn len(&self) -> usize {
        self.blums.len() + self.ices.len() + self.bombs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn feedback(&self) -> &[FloatingFeedback] {
        &self.feedback
    }

    /// Roll once per kind and spawn the winners (nothing spawns while frozen)
    pub fn spawn(&mut self) {
        if self.frozen {
            return;
        }
        for kind in EntityKind::ALL {
            if self.should_spawn(self.weights.weight(kind)) {
                self.spawn_one(kind);
            }
        }
    }

    fn should_spawn(&mut self, weight: u32) -> bool {
        self.rng.random_range(0..SPAWN_ROLL_RANGE) < weight
    }

    /// Place a new entity just above the board at a random column
    pub fn spawn_one(&mut self, kind: EntityKind) -> &TimedEntity {
        let size = self.rng.random_range(self.size_range.clone());
        let left = self.board.left();
        let right = (self.board.right() - size).max(left);
        let x = self.rng.random_range(left..=right);
        let speed = self.rng.random_range(self.speed_range.clone());

        let mut entity = TimedEntity::new(kind, self.assets.visuals(kind));
        entity.set_size(Vec2::splat(size));
        entity.set_position(Vec2::new(x, self.board.top() - size));
        entity.set_direction(DOWN);
        entity.set_speed(speed);
        log::debug!("Spawned {} at x={x:.1} size={size:.1} speed={speed:.1}", kind.as_str());

        let list = self.entities_mut(kind);
        list.push(entity);
        &list[list.len() - 1]
    }

    /// Insert a prepared entity (scripted scenarios, tests)
    pub fn insert(&mut self, entity: TimedEntity) {
        self.entities_mut(entity.kind()).push(entity);
    }

    /// Move every entity and indicator and step their animations
    pub fn advance(&mut self, now: Millis) {
        for entity in self.iter_mut() {
            entity.advance(now);
        }
        for fb in &mut self.feedback {
            fb.advance(now);
        }
    }

    /// Drop entities that left the board or died, and finished indicators
    pub fn reap(&mut self) {
        let sandbox = self.board.extended_up(BOARD_TOP_MARGIN);
        let before = self.len();
        for list in [&mut self.blums, &mut self.ices, &mut self.bombs] {
            list.retain(|e| sandbox.intersects(&e.rect()));
        }
        for list in [&mut self.blums, &mut self.ices, &mut self.bombs] {
            list.retain(TimedEntity::is_alive);
        }
        self.feedback.retain(FloatingFeedback::is_alive);

        let removed = before - self.len();
        if removed > 0 {
            log::trace!("Reaped {removed} entities");
        }
    }

    /// Stop every entity in place and suspend spawning
    pub fn freeze(&mut self) {
        self.frozen = true;
        for entity in self.iter_mut() {
            entity.set_direction(Vec2::ZERO);
        }
    }

    /// Send every entity falling again and resume spawning
    pub fn unfreeze(&mut self) {
        self.frozen = false;
        for entity in self.iter_mut() {
            entity.set_direction(DOWN);
        }
    }

    /// Press every entity under `point`; all simultaneous hits count
    pub fn press(&mut self, point: Vec2) -> Vec<Hit> {
        let mut hits = Vec::new();
        for entity in self.iter_mut() {
            if entity.try_press(point) {
                hits.push(Hit {
                    kind: entity.kind(),
                    rect: entity.rect(),
                });
            }
        }
        hits
    }

    /// Float a score delta out of `source`
    pub fn push_feedback(&mut self, source: Rect, value: i64) {
        self.feedback.push(FloatingFeedback::new(source, value));
    }

    /// Entities, then feedback on top
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for entity in self.iter() {
            entity.draw(canvas);
        }
        for fb in &self.feedback {
            fb.draw(self.assets.font, canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::NullLoader;
    use crate::sim::entity::EntityPhase;

    fn population(seed: u64) -> EntityPopulation {
        let assets = Arc::new(AssetBundle::load(&mut NullLoader::default(), "").unwrap());
        EntityPopulation::new(assets, &Settings::default(), seed)
    }

    fn placed(pop: &EntityPopulation, kind: EntityKind, pos: Vec2, size: f32) -> TimedEntity {
        let mut e = TimedEntity::new(kind, pop.assets.visuals(kind));
        e.set_position(pos);
        e.set_size(Vec2::splat(size));
        e.set_direction(DOWN);
        e.set_speed(100.0);
        e
    }

    #[test]
    fn test_spawn_policy() {
        let mut pop = population(1);
        let board = pop.board();
        for _ in 0..500 {
            let e = pop.spawn_one(EntityKind::Blum).clone();
            let rect = e.rect();
            assert!(rect.size.x >= 26.0 && rect.size.x <= 45.0);
            assert_eq!(rect.size.x, rect.size.y);
            assert!(rect.left() >= board.left());
            assert!(rect.right() <= board.right() + 0.001);
            assert!((rect.bottom() - board.top()).abs() < 0.001);
            assert!(e.speed() >= 100.0 && e.speed() <= 150.0);
            assert_eq!(e.direction(), DOWN);
            assert_eq!(e.phase(), EntityPhase::Idle);
        }
    }

    #[test]
    fn test_spawn_uses_configured_ranges() {
        let assets = Arc::new(AssetBundle::load(&mut NullLoader::default(), "").unwrap());
        let settings = Settings {
            min_size: 10.0,
            max_size: 12.0,
            min_speed: 300.0,
            max_speed: 310.0,
            ..Settings::default()
        };
        let mut pop = EntityPopulation::new(assets, &settings, 9);
        for _ in 0..200 {
            let e = pop.spawn_one(EntityKind::Bomb).clone();
            assert!(e.rect().size.x >= 10.0 && e.rect().size.x <= 12.0);
            assert!(e.speed() >= 300.0 && e.speed() <= 310.0);
        }
    }

    #[test]
    fn test_spawn_frequency_matches_weight() {
        let mut pop = population(12345);
        let trials = 100_000;
        let blum = (0..trials).filter(|_| pop.should_spawn(60)).count();
        let ice = (0..trials).filter(|_| pop.should_spawn(2)).count();
        // Expected 6000 and 200; allow ~5 sigma
        assert!((blum as i64 - 6_000).abs() < 400, "blum spawns: {blum}");
        assert!((ice as i64 - 200).abs() < 75, "ice spawns: {ice}");
        assert_eq!((0..1000).filter(|_| pop.should_spawn(0)).count(), 0);
        assert_eq!((0..1000).filter(|_| pop.should_spawn(1000)).count(), 1000);
    }

    #[test]
    fn test_no_spawn_while_frozen() {
        let mut pop = population(3);
        pop.freeze();
        for _ in 0..1000 {
            pop.spawn();
        }
        assert!(pop.is_empty());
        pop.unfreeze();
        for _ in 0..1000 {
            pop.spawn();
        }
        assert!(!pop.entities(EntityKind::Blum).is_empty());
    }

    #[test]
    fn test_freeze_stops_movement_only() {
        let mut pop = population(4);
        let e = placed(&pop, EntityKind::Blum, Vec2::new(100.0, 100.0), 30.0);
        pop.insert(e);
        pop.advance(0);
        pop.freeze();
        pop.advance(1_000);
        assert_eq!(pop.entities(EntityKind::Blum)[0].position(), Vec2::new(100.0, 100.0));
        pop.unfreeze();
        pop.advance(2_000);
        assert!((pop.entities(EntityKind::Blum)[0].position().y - 200.0).abs() < 0.001);
    }

    #[test]
    fn test_reap_departed_and_dead() {
        let mut pop = population(5);
        let board = pop.board();
        // Still inside the extended region above the board
        let above = placed(&pop, EntityKind::Blum, Vec2::new(10.0, -90.0), 30.0);
        // Entirely above the extended region
        let gone_up = placed(&pop, EntityKind::Ice, Vec2::new(10.0, -200.0), 30.0);
        // Fell below the board
        let gone_down = placed(&pop, EntityKind::Bomb, Vec2::new(10.0, board.bottom() + 1.0), 30.0);
        pop.insert(above);
        pop.insert(gone_up);
        pop.insert(gone_down);
        pop.reap();
        assert_eq!(pop.len(), 1);
        assert_eq!(pop.entities(EntityKind::Blum).len(), 1);

        // Press it and let the activation strip run out (3 x 200 ms)
        pop.freeze();
        pop.advance(0);
        let hits = pop.press(Vec2::new(15.0, -85.0));
        assert_eq!(hits.len(), 1);
        for t in [100, 300, 500, 700] {
            pop.advance(t);
        }
        pop.reap();
        assert!(pop.is_empty());
    }

    #[test]
    fn test_press_reports_every_overlap() {
        let mut pop = population(6);
        let blum = placed(&pop, EntityKind::Blum, Vec2::new(100.0, 100.0), 40.0);
        let bomb = placed(&pop, EntityKind::Bomb, Vec2::new(110.0, 110.0), 40.0);
        let far = placed(&pop, EntityKind::Ice, Vec2::new(300.0, 300.0), 40.0);
        pop.insert(blum);
        pop.insert(bomb);
        pop.insert(far);

        let hits = pop.press(Vec2::new(120.0, 120.0));
        let kinds: Vec<_> = hits.iter().map(|h| h.kind).collect();
        assert_eq!(kinds, vec![EntityKind::Blum, EntityKind::Bomb]);
        // Already activated: second press does nothing
        assert!(pop.press(Vec2::new(120.0, 120.0)).is_empty());
        assert!(pop.press(Vec2::new(0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_feedback_is_reaped_when_faded() {
        let mut pop = population(7);
        pop.push_feedback(Rect::new(0.0, 0.0, 30.0, 30.0), 1);
        pop.advance(0);
        pop.advance(1_000);
        pop.reap();
        assert_eq!(pop.feedback().len(), 1);
        pop.advance(3_000);
        pop.reap();
        assert!(pop.feedback().is_empty());
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = population(99);
        let mut b = population(99);
        for _ in 0..200 {
            a.spawn();
            b.spawn();
        }
        assert_eq!(a.len(), b.len());
        for (ea, eb) in a.iter().zip(b.iter()) {
            assert_eq!(ea.rect(), eb.rect());
        }
    }
}
