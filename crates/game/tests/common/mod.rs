#![allow(dead_code)]

use engine_core::{AssetError, SpriteAtlas, SpriteHandle, SpriteId};
use game::{GameConfig, Roster, World};
use procgen::{BiomeSpec, BiomeTable};
use std::path::PathBuf;

pub struct IdentityAtlas;

impl SpriteAtlas for IdentityAtlas {
    fn get_sprite(&self, id: SpriteId) -> Result<SpriteHandle, AssetError> {
        Ok(SpriteHandle(id as u32))
    }
}

pub fn res_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../res").join(relative)
}

pub fn flat_table() -> BiomeTable {
    BiomeTable::from_specs([(
        "start",
        BiomeSpec {
            next_to: vec!["start".into()],
            surface_tiles: SpriteId::Grass as u32,
            sub_surface_tiles: SpriteId::Dirt as u32,
            gen_amplitude: 0,
            gen_frequency: 1.0,
        },
    )])
}

pub fn shipped_table() -> BiomeTable {
    BiomeTable::load(res_path("world/biomes.ron")).expect("shipped biome table is valid")
}

pub fn roster() -> Roster {
    Roster::from_ron_str(r#"(models: {"Gus": 3, "Clyde": 10})"#).expect("roster")
}

pub fn quiet_config(seed: u64) -> GameConfig {
    GameConfig {
        seed: Some(seed),
        spawn_zombies: false,
        ..GameConfig::default()
    }
}

pub fn flat_world() -> World {
    World::new(quiet_config(7), &flat_table(), &roster(), &IdentityAtlas).expect("world")
}
