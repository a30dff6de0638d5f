//! Game configuration (viewport, world, rules) and the player roster. Loaded from RON at startup.

use engine_core::{AssetError, SpriteId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Simulation settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Viewport width in world units.
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f32,
    /// Viewport height in world units.
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f32,
    /// World seed. `None` picks one at startup.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Level length in tile columns.
    #[serde(default = "default_world_length")]
    pub world_length: i64,
    /// Downward acceleration per tick.
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    /// Let player projectiles hit other players.
    #[serde(default)]
    pub friendly_fire: bool,
    /// Spawn zombies on freshly generated ground.
    #[serde(default = "default_true")]
    pub spawn_zombies: bool,
    /// Simulation ticks per second.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f64,
    /// Stop the headless driver after this many ticks.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
    #[serde(default = "default_biome_file")]
    pub biome_file: PathBuf,
    #[serde(default = "default_roster_file")]
    pub roster_file: PathBuf,
}

fn default_viewport_width() -> f32 {
    1280.0
}
fn default_viewport_height() -> f32 {
    720.0
}
fn default_world_length() -> i64 {
    100
}
fn default_gravity() -> f32 {
    physics::DEFAULT_GRAVITY
}
fn default_true() -> bool {
    true
}
fn default_tick_rate() -> f64 {
    engine_core::DEFAULT_TICK_RATE
}
fn default_max_ticks() -> u64 {
    60 * 60
}
fn default_biome_file() -> PathBuf {
    PathBuf::from("res/world/biomes.ron")
}
fn default_roster_file() -> PathBuf {
    PathBuf::from("res/models.ron")
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            seed: None,
            world_length: default_world_length(),
            gravity: default_gravity(),
            friendly_fire: false,
            spawn_zombies: true,
            tick_rate: default_tick_rate(),
            max_ticks: default_max_ticks(),
            biome_file: default_biome_file(),
            roster_file: default_roster_file(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(config_path())
    }

    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        } else {
            log::info!("No config at {:?}, using defaults", path);
        }
        Self::default()
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.ron")
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("could not read roster {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed roster: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("roster is empty")]
    Empty,
    #[error("character \"{name}\" has an invalid sprite")]
    Sprite {
        name: String,
        #[source]
        source: AssetError,
    },
}

/// Selectable characters: display name to sprite id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub models: BTreeMap<String, u32>,
}

impl Roster {
    pub fn from_ron_str(source: &str) -> Result<Self, RosterError> {
        let roster: Roster = ron::from_str(source)?;
        roster.validate()?;
        Ok(roster)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let roster = Self::from_ron_str(&data)?;
        log::info!("Loaded {} characters from {:?}", roster.models.len(), path);
        Ok(roster)
    }

    pub fn validate(&self) -> Result<(), RosterError> {
        if self.models.is_empty() {
            return Err(RosterError::Empty);
        }
        for (name, raw) in &self.models {
            SpriteId::try_from(*raw).map_err(|source| RosterError::Sprite {
                name: name.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Characters in name order with their sprite ids.
    pub fn characters(&self) -> impl Iterator<Item = (&str, SpriteId)> + '_ {
        self.models
            .iter()
            .filter_map(|(name, raw)| SpriteId::try_from(*raw).ok().map(|id| (name.as_str(), id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: GameConfig = ron::from_str("(world_length: 250, friendly_fire: true)").expect("valid");
        assert_eq!(cfg.world_length, 250);
        assert!(cfg.friendly_fire);
        assert_eq!(cfg.viewport_width, 1280.0);
        assert_eq!(cfg.biome_file, PathBuf::from("res/world/biomes.ron"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = GameConfig::load_from("definitely/not/here/config.ron");
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn roster_parses_and_lists_in_name_order() {
        let roster = Roster::from_ron_str(r#"(models: {"Gus": 3, "Clyde": 10})"#).expect("valid");
        let names: Vec<&str> = roster.characters().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Clyde", "Gus"]);
    }

    #[test]
    fn roster_rejects_unknown_sprite() {
        let err = Roster::from_ron_str(r#"(models: {"Ghost": 77})"#);
        assert!(matches!(err, Err(RosterError::Sprite { name, .. }) if name == "Ghost"));
    }

    #[test]
    fn empty_roster_rejected() {
        assert!(matches!(Roster::from_ron_str("(models: {})"), Err(RosterError::Empty)));
    }
}
