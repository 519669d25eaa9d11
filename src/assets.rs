//! Immutable asset bundle
//!
//! Textures and fonts are decoded by a platform collaborator behind the
//! `AssetLoader` trait. The bundle only keeps the opaque handles it hands
//! back, paired with the frame layout of each sprite strip. It is built once
//! at startup and shared read-only through `Arc`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Millis;
use crate::sim::cycle::{CycleTimer, TimerError};
use crate::sim::entity::EntityKind;

/// Opaque texture handle issued by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(pub u32);

impl TextureId {
    /// Placeholder for a texture that failed to load
    pub const MISSING: TextureId = TextureId(u32::MAX);
}

/// Opaque font handle issued by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontId(pub u32);

impl FontId {
    pub const MISSING: FontId = FontId(u32::MAX);
}

/// Platform side of resource loading: `None` means the load failed
pub trait AssetLoader {
    fn load_texture(&mut self, path: &str) -> Option<TextureId>;
    fn load_font(&mut self, path: &str) -> Option<FontId>;
}

/// Loader for headless runs: every request succeeds with a fresh handle
#[derive(Debug, Default)]
pub struct NullLoader {
    next: u32,
}

impl AssetLoader for NullLoader {
    fn load_texture(&mut self, _path: &str) -> Option<TextureId> {
        self.next += 1;
        Some(TextureId(self.next))
    }

    fn load_font(&mut self, _path: &str) -> Option<FontId> {
        self.next += 1;
        Some(FontId(self.next))
    }
}

/// Asset loading failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// Every path the loader could not provide
    Missing(Vec<String>),
    /// A sprite strip was declared with an unusable frame layout
    Layout { file: &'static str, error: TimerError },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Missing(paths) => {
                write!(f, "failed to load {} asset(s): {}", paths.len(), paths.join(", "))
            }
            AssetError::Layout { file, error } => write!(f, "bad sprite layout for {file}: {error}"),
        }
    }
}

impl std::error::Error for AssetError {}

/// A horizontal strip of equally sized frames and its playback rate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
    pub texture: TextureId,
    template: CycleTimer,
}

impl SpriteSheet {
    pub fn new(texture: TextureId, frames: usize, interval_ms: Millis) -> Result<Self, TimerError> {
        Ok(Self {
            texture,
            template: CycleTimer::new(frames, interval_ms)?,
        })
    }

    /// Fresh timer for one animated instance of this strip
    pub fn timer(&self) -> CycleTimer {
        self.template.clone()
    }

    pub fn frames(&self) -> usize {
        self.template.frame_count()
    }
}

/// The three strips every entity kind carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityVisuals {
    pub glow: SpriteSheet,
    pub activation: SpriteSheet,
    pub idle: SpriteSheet,
}

/// (file, frames, interval ms)
type StripSpec = (&'static str, usize, Millis);

const BLUM_STRIPS: [StripSpec; 3] = [
    ("blum_glow.png", 15, 1000),
    ("blum_activ.png", 3, 200),
    ("blum.png", 12, 200),
];
const ICE_STRIPS: [StripSpec; 3] = [
    ("null.png", 1, 1000),
    ("ice_activ.png", 4, 200),
    ("ice.png", 9, 200),
];
const BOMB_STRIPS: [StripSpec; 3] = [
    ("null.png", 1, 1000),
    ("bomb_activ.png", 3, 200),
    ("bomb.png", 7, 200),
];

const BACKGROUND: StripSpec = ("background.png", 1, 1000);
const FROZEN_OVERLAY: StripSpec = ("frozen_anim.png", 6, 200);
const BOOM_BACKGROUND: StripSpec = ("boom_background_anim.png", 4, 200);
const TIMER_BADGE: StripSpec = ("timer_bg.png", 1, 1000);
const TIMER_ICE_BADGE: StripSpec = ("timer_ice_bg.png", 1, 1000);
const SCORE_BADGE: StripSpec = ("blum_sign.png", 1, 1000);
const SCORE_BOOM_BADGE: StripSpec = ("blum_red_sign.png", 1, 1000);
const FONT_FILE: &str = "Consolas.ttf";

/// Every handle the game draws with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetBundle {
    pub blum: EntityVisuals,
    pub ice: EntityVisuals,
    pub bomb: EntityVisuals,
    pub background: SpriteSheet,
    pub frozen_overlay: SpriteSheet,
    pub boom_background: SpriteSheet,
    pub timer_badge: SpriteSheet,
    pub timer_ice_badge: SpriteSheet,
    pub score_badge: SpriteSheet,
    pub score_boom_badge: SpriteSheet,
    pub font: FontId,
}

impl AssetBundle {
    /// Load every asset from `dir`, reporting all failures at once
    pub fn load(loader: &mut dyn AssetLoader, dir: &str) -> Result<Self, AssetError> {
        let mut session = LoadSession {
            loader,
            dir,
            failed: Vec::new(),
        };

        let blum = session.visuals(&BLUM_STRIPS);
        let ice = session.visuals(&ICE_STRIPS);
        let bomb = session.visuals(&BOMB_STRIPS);
        let background = session.strip(BACKGROUND);
        let frozen_overlay = session.strip(FROZEN_OVERLAY);
        let boom_background = session.strip(BOOM_BACKGROUND);
        let timer_badge = session.strip(TIMER_BADGE);
        let timer_ice_badge = session.strip(TIMER_ICE_BADGE);
        let score_badge = session.strip(SCORE_BADGE);
        let score_boom_badge = session.strip(SCORE_BOOM_BADGE);
        let font = session.font(FONT_FILE);

        if !session.failed.is_empty() {
            return Err(AssetError::Missing(session.failed));
        }

        log::info!("Loaded assets from {dir}");
        Ok(Self {
            blum: blum?,
            ice: ice?,
            bomb: bomb?,
            background: background?,
            frozen_overlay: frozen_overlay?,
            boom_background: boom_background?,
            timer_badge: timer_badge?,
            timer_ice_badge: timer_ice_badge?,
            score_badge: score_badge?,
            score_boom_badge: score_boom_badge?,
            font,
        })
    }

    /// Visuals for an entity kind
    pub fn visuals(&self, kind: EntityKind) -> &EntityVisuals {
        match kind {
            EntityKind::Blum => &self.blum,
            EntityKind::Ice => &self.ice,
            EntityKind::Bomb => &self.bomb,
        }
    }
}

/// Tracks failures while walking the asset tables
struct LoadSession<'a> {
    loader: &'a mut dyn AssetLoader,
    dir: &'a str,
    failed: Vec<String>,
}

impl LoadSession<'_> {
    fn path(&self, file: &str) -> String {
        if self.dir.is_empty() {
            file.to_string()
        } else {
            format!("{}/{}", self.dir.trim_end_matches('/'), file)
        }
    }

    fn texture(&mut self, file: &str) -> TextureId {
        let path = self.path(file);
        match self.loader.load_texture(&path) {
            Some(id) => id,
            None => {
                log::warn!("Failed to load texture {path}");
                self.failed.push(path);
                TextureId::MISSING
            }
        }
    }

    fn font(&mut self, file: &str) -> FontId {
        let path = self.path(file);
        match self.loader.load_font(&path) {
            Some(id) => id,
            None => {
                log::warn!("Failed to load font {path}");
                self.failed.push(path);
                FontId::MISSING
            }
        }
    }

    fn strip(&mut self, (file, frames, interval): StripSpec) -> Result<SpriteSheet, AssetError> {
        let texture = self.texture(file);
        SpriteSheet::new(texture, frames, interval).map_err(|error| AssetError::Layout { file, error })
    }

    fn visuals(&mut self, strips: &[StripSpec; 3]) -> Result<EntityVisuals, AssetError> {
        // Load all three before propagating so every failure gets recorded
        let glow = self.strip(strips[0]);
        let activation = self.strip(strips[1]);
        let idle = self.strip(strips[2]);
        Ok(EntityVisuals {
            glow: glow?,
            activation: activation?,
            idle: idle?,
        })
    }
}
