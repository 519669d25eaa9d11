//! Game settings and tuning
//!
//! Persisted as JSON next to the executable. Every field has a default taken
//! from `consts`, so a partial file only overrides what it names.

use std::fmt;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::entity::EntityKind;
use crate::sim::rect::Rect;

/// Settings could not be read or written
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Parsed fine but a value is out of range
    Invalid(&'static str),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "settings I/O error: {e}"),
            SettingsError::Json(e) => write!(f, "settings JSON error: {e}"),
            SettingsError::Invalid(what) => write!(f, "invalid settings: {what}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Json(e) => Some(e),
            SettingsError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Json(e)
    }
}

/// Spawn chance per tick, out of `SPAWN_ROLL_RANGE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnWeights {
    pub blum: u32,
    pub ice: u32,
    pub bomb: u32,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            blum: BLUM_SPAWN_WEIGHT,
            ice: ICE_SPAWN_WEIGHT,
            bomb: BOMB_SPAWN_WEIGHT,
        }
    }
}

impl SpawnWeights {
    pub fn weight(&self, kind: EntityKind) -> u32 {
        match kind {
            EntityKind::Blum => self.blum,
            EntityKind::Ice => self.ice,
            EntityKind::Bomb => self.bomb,
        }
    }
}

/// Game settings/tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board ===
    pub board_width: f32,
    pub board_height: f32,

    // === Match ===
    /// Match length excluding frozen time (ms)
    pub match_time_ms: u64,
    /// Freeze length after an ice hit (ms)
    pub freeze_time_ms: u64,

    // === Spawning ===
    pub spawn_weights: SpawnWeights,
    pub min_size: f32,
    pub max_size: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// RNG seed; `None` picks one from the OS
    pub seed: Option<u64>,

    // === Resources ===
    /// Directory the asset loader resolves files against
    pub asset_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,

            match_time_ms: MATCH_TIME_MS,
            freeze_time_ms: FREEZE_TIME_MS,

            spawn_weights: SpawnWeights::default(),
            min_size: ENTITY_MIN_SIZE,
            max_size: ENTITY_MAX_SIZE,
            min_speed: ENTITY_MIN_SPEED,
            max_speed: ENTITY_MAX_SPEED,
            seed: None,

            asset_dir: "assets".to_string(),
        }
    }
}

impl Settings {
    /// Board rectangle anchored at the origin
    pub fn board(&self) -> Rect {
        Rect::new(0.0, 0.0, self.board_width, self.board_height)
    }

    pub fn size_range(&self) -> RangeInclusive<f32> {
        self.min_size..=self.max_size
    }

    pub fn speed_range(&self) -> RangeInclusive<f32> {
        self.min_speed..=self.max_speed
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let floats = [
            self.board_width,
            self.board_height,
            self.min_size,
            self.max_size,
            self.min_speed,
            self.max_speed,
        ];
        if !floats.iter().all(|v| v.is_finite()) {
            return Err(SettingsError::Invalid("sizes and speeds must be finite"));
        }
        if !(self.board_width > 0.0 && self.board_height > 0.0) {
            return Err(SettingsError::Invalid("board must have positive size"));
        }
        if self.match_time_ms == 0 || self.freeze_time_ms == 0 {
            return Err(SettingsError::Invalid("match and freeze times must be positive"));
        }
        if !(self.min_size > 0.0 && self.min_size <= self.max_size) {
            return Err(SettingsError::Invalid("entity size range is empty or non-positive"));
        }
        if self.max_size > self.board_width {
            return Err(SettingsError::Invalid("entities wider than the board"));
        }
        if !(self.min_speed >= 0.0 && self.min_speed <= self.max_speed) {
            return Err(SettingsError::Invalid("entity speed range is empty or negative"));
        }
        let w = self.spawn_weights;
        if w.blum > SPAWN_ROLL_RANGE || w.ice > SPAWN_ROLL_RANGE || w.bomb > SPAWN_ROLL_RANGE {
            return Err(SettingsError::Invalid("spawn weight above roll range"));
        }
        Ok(())
    }

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read settings from a file, falling back to defaults on any error
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.match_time_ms, 45_000);
        assert_eq!(settings.freeze_time_ms, 2_000);
        assert_eq!(settings.spawn_weights.weight(EntityKind::Blum), 60);
        assert_eq!(settings.spawn_weights.weight(EntityKind::Bomb), 2);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "match_time_ms": 30000, "seed": 7 }"#).unwrap();
        assert_eq!(settings.match_time_ms, 30_000);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.freeze_time_ms, FREEZE_TIME_MS);
        assert_eq!(settings.spawn_weights, SpawnWeights::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut settings = Settings::default();
        settings.spawn_weights.ice = 10;
        let back = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Settings::from_json(r#"{ "min_size": 50, "max_size": 40 }"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "spawn_weights": { "blum": 5000 } }"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(Settings::from_json("{ nope"), Err(SettingsError::Json(_))));
    }

    #[test]
    fn test_rejects_non_finite_values() {
        // 1e39 overflows f32 to infinity
        for json in [
            r#"{ "max_speed": 1e39 }"#,
            r#"{ "board_width": 1e39 }"#,
            r#"{ "board_height": 1e39 }"#,
            r#"{ "max_size": 1e39, "board_width": 1e39 }"#,
        ] {
            assert!(
                matches!(Settings::from_json(json), Err(SettingsError::Invalid(_))),
                "accepted {json}"
            );
        }
        let settings = Settings {
            min_speed: f32::NAN,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let settings = Settings::load("/definitely/not/here/settings.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load_from() {
        let path = std::env::temp_dir().join(format!("blum-drop-settings-{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.seed = Some(42);
        settings.save(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }
}
