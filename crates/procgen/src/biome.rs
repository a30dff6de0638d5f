//! Biome configuration and the runtime record of a biome being generated.
//!
//! The table is loaded once per level from `biomes.ron`. Every problem that
//! could fault generation later (an empty `next_to`, a dangling neighbour, a
//! zero frequency, an unknown tile id) is rejected here.

use engine_core::{AssetError, SpriteAtlas, SpriteHandle, SpriteId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the biome every level opens with.
pub const START_BIOME: &str = "start";

/// One biome entry as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeSpec {
    /// Candidate biomes that may follow this one.
    #[serde(default)]
    pub next_to: Vec<String>,
    /// Sprite id of the top solid tile.
    pub surface_tiles: u32,
    /// Sprite id of every solid tile below the surface.
    pub sub_surface_tiles: u32,
    /// Maximum ground offset from the floor baseline, in rows.
    pub gen_amplitude: u32,
    /// Noise frequency multiplier (higher = longer hills).
    pub gen_frequency: f64,
}

/// Every biome keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BiomeTable {
    pub biomes: BTreeMap<String, BiomeSpec>,
}

#[derive(Debug, Error)]
pub enum BiomeConfigError {
    #[error("could not read biome table {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed biome table: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("biome table has no \"start\" entry")]
    MissingStart,
    #[error("biome \"{0}\" has an empty next_to list")]
    EmptyAdjacency(String),
    #[error("biome \"{biome}\" lists unknown neighbour \"{neighbour}\"")]
    UnknownNeighbour { biome: String, neighbour: String },
    #[error("biome \"{biome}\" has non-positive gen_frequency {frequency}")]
    InvalidFrequency { biome: String, frequency: f64 },
    #[error("biome \"{biome}\" tile sprite could not be resolved")]
    Sprite {
        biome: String,
        #[source]
        source: AssetError,
    },
}

impl BiomeTable {
    pub fn from_specs<I, S>(specs: I) -> Self
    where
        I: IntoIterator<Item = (S, BiomeSpec)>,
        S: Into<String>,
    {
        Self {
            biomes: specs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Parse and validate a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self, BiomeConfigError> {
        let table: BiomeTable = ron::from_str(source)?;
        table.validate()?;
        Ok(table)
    }

    /// Read, parse and validate a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BiomeConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| BiomeConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_ron_str(&data)?;
        log::info!("Loaded {} biomes from {:?}", table.biomes.len(), path);
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), BiomeConfigError> {
        if !self.biomes.contains_key(START_BIOME) {
            return Err(BiomeConfigError::MissingStart);
        }
        for (name, spec) in &self.biomes {
            if spec.next_to.is_empty() {
                return Err(BiomeConfigError::EmptyAdjacency(name.clone()));
            }
            if let Some(missing) = spec.next_to.iter().find(|n| !self.biomes.contains_key(*n)) {
                return Err(BiomeConfigError::UnknownNeighbour {
                    biome: name.clone(),
                    neighbour: missing.clone(),
                });
            }
            if !(spec.gen_frequency > 0.0) || !spec.gen_frequency.is_finite() {
                return Err(BiomeConfigError::InvalidFrequency {
                    biome: name.clone(),
                    frequency: spec.gen_frequency,
                });
            }
            for raw in [spec.surface_tiles, spec.sub_surface_tiles] {
                SpriteId::try_from(raw).map_err(|source| BiomeConfigError::Sprite {
                    biome: name.clone(),
                    source,
                })?;
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&BiomeSpec> {
        self.biomes.get(name)
    }
}

/// Resolved tile sprites for one biome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiomeTiles {
    pub surface: SpriteHandle,
    pub subsurface: SpriteHandle,
}

impl BiomeTiles {
    pub fn resolve(
        name: &str,
        spec: &BiomeSpec,
        atlas: &dyn SpriteAtlas,
    ) -> Result<Self, BiomeConfigError> {
        let lookup = |raw: u32| {
            SpriteId::try_from(raw)
                .and_then(|id| atlas.get_sprite(id))
                .map_err(|source| BiomeConfigError::Sprite {
                    biome: name.to_string(),
                    source,
                })
        };
        Ok(Self {
            surface: lookup(spec.surface_tiles)?,
            subsurface: lookup(spec.sub_surface_tiles)?,
        })
    }
}

/// A biome occupying a run of generated columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Biome {
    pub kind: String,
    /// Logical column where this biome began.
    pub start_column: i64,
    /// Floor row inherited from the previous biome.
    pub floor_base: i32,
    /// Ground row of the most recent column; frozen once the biome ends.
    pub floor_height: i32,
    pub amplitude: u32,
    pub frequency: f64,
    pub next_to: Vec<String>,
    pub tiles: BiomeTiles,
}

impl Biome {
    pub fn begin(kind: &str, spec: &BiomeSpec, tiles: BiomeTiles, start_column: i64, floor: i32) -> Self {
        Self {
            kind: kind.to_string(),
            start_column,
            floor_base: floor,
            floor_height: floor,
            amplitude: spec.gen_amplitude,
            frequency: spec.gen_frequency,
            next_to: spec.next_to.clone(),
            tiles,
        }
    }
}
