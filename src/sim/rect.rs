//! Axis-aligned rectangles in board space
//!
//! Screen coordinates: x grows right, y grows down, `pos` is the top-left.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Float rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Half-open containment: `[left, right) x [top, bottom)`
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// True if the two rectangles share a region of positive area
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left().max(other.left()) < self.right().min(other.right())
            && self.top().max(other.top()) < self.bottom().min(other.bottom())
    }

    /// Same rectangle with the top edge raised by `margin` (bottom unchanged)
    pub fn extended_up(&self, margin: f32) -> Rect {
        Rect::new(
            self.pos.x,
            self.pos.y - margin,
            self.size.x,
            self.size.y + margin,
        )
    }
}
