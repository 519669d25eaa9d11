//! Floating score-delta indicators
//!
//! Spawned centred on a clicked entity, they drift upward and fade out.

use glam::Vec2;

use super::rect::Rect;
use crate::Millis;
use crate::assets::FontId;
use crate::consts::{FEEDBACK_FADE_SPEED, FEEDBACK_FONT_SIZE, FEEDBACK_RISE_SPEED};
use crate::render::{Align, Canvas, DrawCommand, Rgba};

/// "+1" / "+0" / "-100" popping out of a clicked entity
#[derive(Debug, Clone)]
pub struct FloatingFeedback {
    value: i64,
    color: Rgba,
    /// Top-centre of the text
    pos: Vec2,
    /// 0-255, kept fractional so slow frames still fade smoothly
    alpha: f32,
    alive: bool,
    last_update: Option<Millis>,
}

impl FloatingFeedback {
    pub fn new(source: Rect, value: i64) -> Self {
        let color = if value < 0 { Rgba::RED } else { Rgba::YELLOW };
        // Vertically centre a line of text on the source rectangle
        let pos = Vec2::new(
            source.center().x,
            source.center().y - FEEDBACK_FONT_SIZE as f32 / 2.0,
        );
        Self {
            value,
            color,
            pos,
            alpha: 255.0,
            alive: true,
            last_update: None,
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    /// Displayed text, always signed
    pub fn text(&self) -> String {
        if self.value < 0 {
            self.value.to_string()
        } else {
            format!("+{}", self.value)
        }
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn alpha(&self) -> u8 {
        self.alpha as u8
    }

    pub fn color(&self) -> Rgba {
        self.color.with_alpha(self.alpha())
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Rise and fade by the time since the previous call
    pub fn advance(&mut self, now: Millis) {
        let Some(last) = self.last_update.replace(now) else {
            return;
        };
        let dt = now.saturating_sub(last) as f32 / 1000.0;
        self.pos.y -= FEEDBACK_RISE_SPEED * dt;
        self.alpha -= FEEDBACK_FADE_SPEED * dt;
        if self.alpha <= 0.0 {
            self.alpha = 0.0;
            self.alive = false;
        }
    }

    pub fn draw(&self, font: FontId, canvas: &mut dyn Canvas) {
        if !self.alive {
            return;
        }
        canvas.draw(DrawCommand::Text {
            font,
            content: self.text(),
            anchor: self.pos,
            align: Align::Center,
            size: FEEDBACK_FONT_SIZE,
            scale: 1.0,
            color: self.color(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_text_and_color_follow_sign() {
        let rect = Rect::new(0.0, 0.0, 40.0, 40.0);
        let plus = FloatingFeedback::new(rect, 1);
        assert_eq!(plus.text(), "+1");
        assert_eq!(plus.color(), Rgba::YELLOW);
        assert_eq!(FloatingFeedback::new(rect, 0).text(), "+0");
        let minus = FloatingFeedback::new(rect, -100);
        assert_eq!(minus.text(), "-100");
        assert_eq!(minus.color(), Rgba::RED);
    }

    #[test]
    fn test_first_advance_is_baseline() {
        let mut fb = FloatingFeedback::new(Rect::new(0.0, 100.0, 40.0, 40.0), 1);
        let start = fb.position();
        fb.advance(10_000);
        assert_eq!(fb.position(), start);
        assert_eq!(fb.alpha(), 255);
    }

    #[test]
    fn test_rises_and_fades() {
        let mut fb = FloatingFeedback::new(Rect::new(0.0, 100.0, 40.0, 40.0), 1);
        let start = fb.position();
        fb.advance(0);
        fb.advance(1_000);
        assert!((start.y - fb.position().y - 20.0).abs() < 0.001);
        assert_eq!(fb.alpha(), 155);
        assert!(fb.is_alive());
    }

    #[test]
    fn test_dies_at_zero_alpha() {
        let mut fb = FloatingFeedback::new(Rect::new(0.0, 0.0, 10.0, 10.0), -100);
        fb.advance(0);
        fb.advance(2_500);
        assert!(fb.is_alive());
        fb.advance(2_600);
        assert!(!fb.is_alive());
        assert_eq!(fb.alpha(), 0);

        let mut canvas: Vec<DrawCommand> = Vec::new();
        fb.draw(FontId(1), &mut canvas);
        assert!(canvas.is_empty());
    }

    proptest! {
        #[test]
        fn alpha_never_increases(steps in proptest::collection::vec(0u64..400, 1..40)) {
            let mut fb = FloatingFeedback::new(Rect::new(0.0, 0.0, 10.0, 10.0), 1);
            let mut now = 0;
            fb.advance(now);
            let mut prev = fb.alpha();
            for step in steps {
                now += step;
                fb.advance(now);
                prop_assert!(fb.alpha() <= prev);
                prop_assert_eq!(fb.is_alive(), fb.alpha > 0.0);
                prev = fb.alpha();
            }
        }
    }
}
