//! Heads-up display and screen effects
//!
//! Labels hold display state only. The match controller feeds them values in
//! `update`; `observe` stamps the effect start times on the frame clock and
//! `draw` emits the badge and text.

use glam::Vec2;

use crate::Millis;
use crate::assets::{AssetBundle, SpriteSheet, TextureId};
use crate::consts::*;
use crate::format_clock;
use crate::render::{Align, Canvas, DrawCommand, Rgba};
use crate::sim::cycle::CycleTimer;
use crate::sim::rect::Rect;

/// Consolas advance width as a fraction of the point size
const GLYPH_ADVANCE: f32 = 0.55;

/// `true` while `now` is within `duration` of `started`
fn within(started: Option<Millis>, now: Millis, duration: Millis) -> bool {
    started.is_some_and(|t| now.saturating_sub(t) <= duration)
}

/// Cash counter, anchored to the top-right corner of the board
#[derive(Debug, Clone)]
pub struct ScoreLabel {
    /// Top-right corner of the text
    anchor: Vec2,
    score: u64,
    text: String,
    score_changed: bool,
    boom_requested: bool,
    grow_started: Option<Millis>,
    boom_started: Option<Millis>,
    scale: f32,
    red: bool,
}

impl ScoreLabel {
    pub fn new(board: Rect) -> Self {
        Self {
            anchor: Vec2::new(board.right() - HUD_MARGIN, board.top() + HUD_MARGIN),
            score: 0,
            text: "0".to_string(),
            score_changed: false,
            boom_requested: false,
            grow_started: None,
            boom_started: None,
            scale: 1.0,
            red: false,
        }
    }

    /// Update the shown value; a change restarts the grow effect
    pub fn set_score(&mut self, score: u64) {
        if score == self.score {
            return;
        }
        self.score = score;
        self.text = score.to_string();
        self.score_changed = true;
    }

    /// Show the bomb style for a while
    pub fn boom(&mut self) {
        self.boom_requested = true;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn is_red(&self) -> bool {
        self.red
    }

    /// Resolve pending effects against the frame time
    pub fn observe(&mut self, now: Millis) {
        if std::mem::take(&mut self.score_changed) {
            self.grow_started = Some(now);
        }
        if std::mem::take(&mut self.boom_requested) {
            self.boom_started = Some(now);
        }

        self.scale = match self.grow_started {
            Some(t) if now.saturating_sub(t) <= SCORE_GROW_TIME_MS => {
                let secs = now.saturating_sub(t) as f32 / 1000.0;
                self.scale.max(1.0 + secs * SCORE_GROW_PER_SEC)
            }
            _ => 1.0,
        };
        self.red = within(self.boom_started, now, SCORE_BOOM_TIME_MS);
    }

    pub fn draw(&self, assets: &AssetBundle, canvas: &mut dyn Canvas) {
        let size = HUD_FONT_SIZE as f32 * self.scale;
        let text_width = self.text.chars().count() as f32 * size * GLYPH_ADVANCE;
        let (badge, color) = if self.red {
            (&assets.score_boom_badge, Rgba::RED)
        } else {
            (&assets.score_badge, Rgba::WHITE)
        };

        // Square badge just left of the digits
        let badge_pos = Vec2::new(self.anchor.x - text_width - size, self.anchor.y);
        canvas.draw(first_frame(badge, Rect::from_pos_size(badge_pos, Vec2::splat(size))));
        canvas.draw(DrawCommand::Text {
            font: assets.font,
            content: self.text.clone(),
            anchor: self.anchor,
            align: Align::Right,
            size: HUD_FONT_SIZE,
            scale: self.scale,
            color,
        });
    }
}

/// Countdown `MM:SS` on a badge, anchored to the top-left corner of the board
#[derive(Debug, Clone)]
pub struct TimerLabel {
    /// Top-left corner of the badge
    anchor: Vec2,
    seconds: i64,
    text: String,
    ice_requested: bool,
    ice_started: Option<Millis>,
    icy: bool,
}

impl TimerLabel {
    pub fn new(board: Rect) -> Self {
        Self {
            anchor: Vec2::new(board.left() + HUD_MARGIN, board.top() + HUD_MARGIN),
            seconds: 0,
            text: format_clock(0),
            ice_requested: false,
            ice_started: None,
            icy: false,
        }
    }

    pub fn set_seconds(&mut self, seconds: i64) {
        if seconds != self.seconds {
            self.seconds = seconds;
            self.text = format_clock(seconds);
        }
    }

    /// Show the frozen style for a while
    pub fn ice(&mut self) {
        self.ice_requested = true;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_icy(&self) -> bool {
        self.icy
    }

    pub fn observe(&mut self, now: Millis) {
        if std::mem::take(&mut self.ice_requested) {
            self.ice_started = Some(now);
        }
        self.icy = within(self.ice_started, now, TIMER_ICE_TIME_MS);
    }

    pub fn draw(&self, assets: &AssetBundle, canvas: &mut dyn Canvas) {
        let badge = if self.icy {
            &assets.timer_ice_badge
        } else {
            &assets.timer_badge
        };
        let rect = Rect::from_pos_size(
            self.anchor,
            Vec2::new(TIMER_BADGE_WIDTH, TIMER_BADGE_HEIGHT),
        );
        canvas.draw(first_frame(badge, rect));
        canvas.draw(DrawCommand::Text {
            font: assets.font,
            content: self.text.clone(),
            anchor: Vec2::new(self.anchor.x + TIMER_TEXT_OFFSET, self.anchor.y),
            align: Align::Left,
            size: HUD_FONT_SIZE,
            scale: 1.0,
            color: Rgba::YELLOW,
        });
    }
}

fn first_frame(sheet: &SpriteSheet, rect: Rect) -> DrawCommand {
    DrawCommand::Sprite {
        texture: sheet.texture,
        frame: 0,
        frames: sheet.frames(),
        rect,
    }
}

/// Full-board animation that plays once when triggered
#[derive(Debug, Clone)]
pub struct OneShot {
    texture: TextureId,
    timer: CycleTimer,
    active: bool,
}

impl OneShot {
    pub fn new(sheet: &SpriteSheet) -> Self {
        Self {
            texture: sheet.texture,
            timer: sheet.timer(),
            active: false,
        }
    }

    /// Restart from the first frame
    pub fn trigger(&mut self) {
        self.timer.start();
        self.active = true;
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Step the animation; deactivates after one full pass
    pub fn step(&mut self, now: Millis) -> bool {
        if !self.active {
            return false;
        }
        if self.timer.is_end(now) {
            self.active = false;
            return false;
        }
        self.timer.current_index(now);
        true
    }

    pub fn command(&self, rect: Rect) -> DrawCommand {
        DrawCommand::Sprite {
            texture: self.texture,
            frame: self.timer.index(),
            frames: self.timer.frame_count(),
            rect,
        }
    }
}

/// Board background with the bomb flash and the frozen overlay
#[derive(Debug, Clone)]
pub struct Backdrop {
    board: Rect,
    background: SpriteSheet,
    pub boom: OneShot,
    pub frozen: OneShot,
}

impl Backdrop {
    pub fn new(assets: &AssetBundle, board: Rect) -> Self {
        Self {
            board,
            background: assets.background.clone(),
            boom: OneShot::new(&assets.boom_background),
            frozen: OneShot::new(&assets.frozen_overlay),
        }
    }

    pub fn step(&mut self, now: Millis) {
        self.boom.step(now);
        self.frozen.step(now);
    }

    /// Background layer; the bomb flash replaces it while playing
    pub fn draw_background(&self, canvas: &mut dyn Canvas) {
        if self.boom.is_active() {
            canvas.draw(self.boom.command(self.board));
        } else {
            canvas.draw(first_frame(&self.background, self.board));
        }
    }

    /// Overlay layer, drawn above the entities
    pub fn draw_overlay(&self, canvas: &mut dyn Canvas) {
        if self.frozen.is_active() {
            canvas.draw(self.frozen.command(self.board));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::NullLoader;

    fn board() -> Rect {
        Rect::new(0.0, 0.0, BOARD_WIDTH, BOARD_HEIGHT)
    }

    fn assets() -> AssetBundle {
        AssetBundle::load(&mut NullLoader::default(), "").unwrap()
    }

    #[test]
    fn test_score_grows_then_snaps_back() {
        let mut label = ScoreLabel::new(board());
        label.set_score(1);
        label.observe(1_000);
        assert!((label.scale() - 1.0).abs() < 0.001);
        label.observe(1_200);
        assert!((label.scale() - 1.1).abs() < 0.001);
        label.observe(1_500);
        assert!((label.scale() - 1.25).abs() < 0.001);
        label.observe(1_501);
        assert!((label.scale() - 1.0).abs() < 0.001);
        assert_eq!(label.text(), "1");
    }

    #[test]
    fn test_score_growth_never_shrinks_on_restart() {
        let mut label = ScoreLabel::new(board());
        label.set_score(1);
        label.observe(0);
        label.observe(400);
        assert!((label.scale() - 1.2).abs() < 0.001);
        label.set_score(2);
        label.observe(450);
        assert!((label.scale() - 1.2).abs() < 0.001);
        label.observe(850);
        assert!((label.scale() - 1.2).abs() < 0.001);
    }

    #[test]
    fn test_same_score_does_not_restart_growth() {
        let mut label = ScoreLabel::new(board());
        label.set_score(0);
        label.observe(100);
        assert!((label.scale() - 1.0).abs() < 0.001);
        assert!(label.grow_started.is_none());
    }

    #[test]
    fn test_boom_turns_red_for_half_a_second() {
        let assets = assets();
        let mut label = ScoreLabel::new(board());
        label.boom();
        label.observe(2_000);
        assert!(label.is_red());
        label.observe(2_500);
        assert!(label.is_red());

        let mut cmds: Vec<DrawCommand> = Vec::new();
        label.draw(&assets, &mut cmds);
        match &cmds[0] {
            DrawCommand::Sprite { texture, .. } => assert_eq!(*texture, assets.score_boom_badge.texture),
            other => panic!("unexpected {other:?}"),
        }
        match &cmds[1] {
            DrawCommand::Text { color, align, .. } => {
                assert_eq!(*color, Rgba::RED);
                assert_eq!(*align, Align::Right);
            }
            other => panic!("unexpected {other:?}"),
        }

        label.observe(2_501);
        assert!(!label.is_red());
    }

    #[test]
    fn test_timer_text_and_ice_style() {
        let assets = assets();
        let mut label = TimerLabel::new(board());
        label.set_seconds(45);
        assert_eq!(label.text(), "00:45");
        label.set_seconds(-3);
        assert_eq!(label.text(), "00:00");

        label.ice();
        label.observe(5_000);
        assert!(label.is_icy());
        label.observe(7_000);
        assert!(label.is_icy());

        let mut cmds: Vec<DrawCommand> = Vec::new();
        label.draw(&assets, &mut cmds);
        match &cmds[0] {
            DrawCommand::Sprite { texture, rect, .. } => {
                assert_eq!(*texture, assets.timer_ice_badge.texture);
                assert!((rect.left() - HUD_MARGIN).abs() < 0.001);
                assert!((rect.size.x - TIMER_BADGE_WIDTH).abs() < 0.001);
            }
            other => panic!("unexpected {other:?}"),
        }
        match &cmds[1] {
            DrawCommand::Text { content, anchor, color, .. } => {
                assert_eq!(content, "00:00");
                assert!((anchor.x - (HUD_MARGIN + TIMER_TEXT_OFFSET)).abs() < 0.001);
                assert_eq!(*color, Rgba::YELLOW);
            }
            other => panic!("unexpected {other:?}"),
        }

        label.observe(7_001);
        assert!(!label.is_icy());
    }

    #[test]
    fn test_one_shot_plays_once() {
        let assets = assets();
        // Boom background: 4 frames at 200 ms
        let mut shot = OneShot::new(&assets.boom_background);
        assert!(!shot.step(0));
        shot.trigger();
        assert!(shot.step(1_000));
        assert!(shot.step(1_200));
        assert!(shot.step(1_400));
        assert!(shot.step(1_600));
        assert!(!shot.step(1_800));
        assert!(!shot.is_active());
    }

    #[test]
    fn test_backdrop_layers() {
        let assets = assets();
        let mut backdrop = Backdrop::new(&assets, board());
        let mut cmds: Vec<DrawCommand> = Vec::new();
        backdrop.draw_background(&mut cmds);
        backdrop.draw_overlay(&mut cmds);
        assert_eq!(cmds.len(), 1);

        backdrop.boom.trigger();
        backdrop.frozen.trigger();
        backdrop.step(0);
        let mut cmds: Vec<DrawCommand> = Vec::new();
        backdrop.draw_background(&mut cmds);
        backdrop.draw_overlay(&mut cmds);
        match (&cmds[0], &cmds[1]) {
            (
                DrawCommand::Sprite { texture: under, .. },
                DrawCommand::Sprite { texture: over, .. },
            ) => {
                assert_eq!(*under, assets.boom_background.texture);
                assert_eq!(*over, assets.frozen_overlay.texture);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
