//! Draw-command vocabulary
//!
//! The simulation knows nothing about pixel formats or fonts. Each frame it
//! emits positioned handles into a `Canvas`; the platform renderer turns them
//! into actual draw calls.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::assets::{FontId, TextureId};
use crate::sim::rect::Rect;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const YELLOW: Rgba = Rgba::new(255, 255, 0, 255);
    pub const RED: Rgba = Rgba::new(255, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Horizontal text alignment relative to the anchor point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One positioned visual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Frame `frame` of a horizontal strip, stretched over `rect`
    Sprite {
        texture: TextureId,
        frame: usize,
        frames: usize,
        rect: Rect,
    },
    /// A line of text; `anchor` is the top edge at the aligned side
    Text {
        font: FontId,
        content: String,
        anchor: Vec2,
        align: Align,
        size: u32,
        scale: f32,
        color: Rgba,
    },
}

/// Renderer collaborator
pub trait Canvas {
    fn draw(&mut self, cmd: DrawCommand);
}

/// Recording canvas
impl Canvas for Vec<DrawCommand> {
    fn draw(&mut self, cmd: DrawCommand) {
        self.push(cmd);
    }
}

/// Drops everything (benchmarks, headless runs without output)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCanvas;

impl Canvas for NullCanvas {
    fn draw(&mut self, _cmd: DrawCommand) {}
}
