//! Streams terrain into the ring grid ahead of the camera.
//!
//! Generation is triggered once the cursor is within [`MIN_GEN_MARGIN`]
//! columns of the visible window start and then runs until the cursor reaches
//! `visible_start + MAX_GEN_MARGIN`, which bounds per-tick work. Biomes are
//! chained through their `next_to` lists; each inherits the final floor height
//! of its predecessor so terrain is continuous across boundaries.

use engine_core::SpriteAtlas;
use glam::Vec2;
use rand::Rng;
use std::collections::HashMap;

use crate::biome::{Biome, BiomeConfigError, BiomeSpec, BiomeTable, BiomeTiles, START_BIOME};
use crate::terrain::TerrainNoise;
use crate::tile_grid::{ColumnFill, RingTileGrid, TILE_SIZE, WORLD_BUFFER_HEIGHT};

/// Generation never runs further than this many columns past the visible start.
pub const MAX_GEN_MARGIN: i64 = 80;
/// Generation starts once the cursor is this close to the visible start.
pub const MIN_GEN_MARGIN: i64 = 40;
/// Columns generated per biome before switching.
pub const BIOME_LENGTH: i64 = 8;
/// Biome ring size: enough entries to cover the largest look-ahead.
pub const BIOME_RING_LEN: usize = (MAX_GEN_MARGIN / BIOME_LENGTH) as usize + 1;
/// Floor baseline of the opening biome.
pub const INITIAL_FLOOR_ROW: i32 = WORLD_BUFFER_HEIGHT as i32 / 2;
/// Highest row the ground surface may reach.
pub const MIN_GROUND_ROW: i32 = 4;
/// One zombie spawn per this many generated columns, on average.
pub const SPAWN_ONE_IN: u32 = 10;
/// Columns at the start of the level that never spawn zombies.
pub const SPAWN_SAFE_COLUMNS: i64 = 4;

/// A biome type with its sprites resolved.
#[derive(Debug, Clone)]
struct BiomeProfile {
    spec: BiomeSpec,
    tiles: BiomeTiles,
}

/// A column written during one [`BiomeGenerator::extend`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedColumn {
    pub column: i64,
    pub ground_row: usize,
}

/// A switch from one biome to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct BiomeTransition {
    /// First column of the new biome.
    pub column: i64,
    pub from: String,
    pub to: String,
    /// Final floor height of `from`, inherited by `to`.
    pub floor: i32,
}

/// What one `extend` call produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    pub columns: Vec<GeneratedColumn>,
    pub transitions: Vec<BiomeTransition>,
    /// Top-left positions for hostile spawns, standing on fresh ground.
    pub spawn_points: Vec<Vec2>,
}

impl GenerationReport {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Seeded biome-chain terrain generator.
#[derive(Debug, Clone)]
pub struct BiomeGenerator {
    profiles: HashMap<String, BiomeProfile>,
    biomes: Vec<Biome>,
    active: usize,
    /// Next logical column to generate. Never decreases.
    cursor: i64,
    world_length: i64,
    noise: TerrainNoise,
}

impl BiomeGenerator {
    /// Validate the table, resolve every biome's sprites and open with
    /// [`START_BIOME`] at [`INITIAL_FLOOR_ROW`].
    pub fn new(
        table: &BiomeTable,
        atlas: &dyn SpriteAtlas,
        world_length: i64,
        seed: u64,
    ) -> Result<Self, BiomeConfigError> {
        table.validate()?;
        let mut profiles = HashMap::with_capacity(table.biomes.len());
        for (name, spec) in &table.biomes {
            let tiles = BiomeTiles::resolve(name, spec, atlas)?;
            profiles.insert(
                name.clone(),
                BiomeProfile {
                    spec: spec.clone(),
                    tiles,
                },
            );
        }
        let start = profiles
            .get(START_BIOME)
            .ok_or(BiomeConfigError::MissingStart)?;
        let opening = Biome::begin(START_BIOME, &start.spec, start.tiles, 0, INITIAL_FLOOR_ROW);

        log::info!(
            "Level generator ready: {} biome types, world length {} columns, seed {}",
            profiles.len(),
            world_length,
            seed
        );

        Ok(Self {
            profiles,
            biomes: vec![opening; BIOME_RING_LEN],
            active: 0,
            cursor: 0,
            world_length,
            noise: TerrainNoise::new(seed),
        })
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn world_length(&self) -> i64 {
        self.world_length
    }

    /// True once every column of the level proper has been generated.
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.world_length
    }

    pub fn active_biome(&self) -> &Biome {
        &self.biomes[self.active]
    }

    /// Generate ahead of `visible_start` if the cursor is inside the trigger margin.
    pub fn extend<R: Rng + ?Sized>(
        &mut self,
        grid: &mut RingTileGrid,
        visible_start: i64,
        rng: &mut R,
    ) -> GenerationReport {
        let mut report = GenerationReport::default();
        if self.cursor > visible_start + MIN_GEN_MARGIN {
            return report;
        }

        let target = visible_start + MAX_GEN_MARGIN;
        while self.cursor < target {
            let ground_row = if self.cursor < self.world_length {
                self.generate_column(grid, rng, &mut report)
            } else {
                self.plateau_column(grid)
            };
            report.columns.push(GeneratedColumn {
                column: self.cursor,
                ground_row,
            });
            self.cursor += 1;
        }

        log::debug!(
            "Generated {} columns (cursor {}, biome {})",
            report.columns.len(),
            self.cursor,
            self.active_biome().kind
        );
        report
    }

    fn generate_column<R: Rng + ?Sized>(
        &mut self,
        grid: &mut RingTileGrid,
        rng: &mut R,
        report: &mut GenerationReport,
    ) -> usize {
        if self.cursor >= self.active_biome().start_column + BIOME_LENGTH {
            if let Some(transition) = self.advance_biome(rng) {
                report.transitions.push(transition);
            }
        }

        let column = self.cursor;
        let biome = &mut self.biomes[self.active];
        let raw = self.noise.sample_column(column, biome.frequency);
        let offset = (raw * biome.amplitude as f64).round() as i32;
        let ground = (biome.floor_base + offset).clamp(MIN_GROUND_ROW, WORLD_BUFFER_HEIGHT as i32 - 1);
        biome.floor_height = ground;

        let ground_row = ground as usize;
        grid.write_column(
            column,
            &ColumnFill {
                ground_row,
                surface: biome.tiles.surface,
                subsurface: biome.tiles.subsurface,
            },
        );

        if column >= SPAWN_SAFE_COLUMNS && rng.gen_ratio(1, SPAWN_ONE_IN) {
            report.spawn_points.push(Vec2::new(
                column as f32 * TILE_SIZE,
                (ground as f32 - 1.0) * TILE_SIZE,
            ));
        }
        ground_row
    }

    /// Past the end of the level: flat ground at the last floor height.
    fn plateau_column(&mut self, grid: &mut RingTileGrid) -> usize {
        let biome = &self.biomes[self.active];
        let ground_row = biome.floor_height as usize;
        grid.write_column(
            self.cursor,
            &ColumnFill {
                ground_row,
                surface: biome.tiles.surface,
                subsurface: biome.tiles.subsurface,
            },
        );
        ground_row
    }

    /// Pick the next biome from the active one's neighbours and start it at the cursor.
    fn advance_biome<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<BiomeTransition> {
        let previous = &self.biomes[self.active];
        // Non-empty by table validation.
        let pick = rng.gen_range(0..previous.next_to.len());
        let next_kind = previous.next_to[pick].clone();
        let Some(profile) = self.profiles.get(&next_kind) else {
            log::warn!("Biome {} vanished from the table, extending {}", next_kind, previous.kind);
            self.biomes[self.active].start_column = self.cursor;
            return None;
        };

        let transition = BiomeTransition {
            column: self.cursor,
            from: previous.kind.clone(),
            to: next_kind.clone(),
            floor: previous.floor_height,
        };
        let next = Biome::begin(&next_kind, &profile.spec, profile.tiles, self.cursor, previous.floor_height);

        self.active = (self.active + 1) % self.biomes.len();
        self.biomes[self.active] = next;
        log::debug!(
            "Biome {} -> {} at column {} (floor {})",
            transition.from,
            transition.to,
            transition.column,
            transition.floor
        );
        Some(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{AssetError, SpriteHandle, SpriteId};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct IdentityAtlas;

    impl SpriteAtlas for IdentityAtlas {
        fn get_sprite(&self, id: SpriteId) -> Result<SpriteHandle, AssetError> {
            Ok(SpriteHandle(id as u32))
        }
    }

    struct EmptyAtlas;

    impl SpriteAtlas for EmptyAtlas {
        fn get_sprite(&self, id: SpriteId) -> Result<SpriteHandle, AssetError> {
            Err(AssetError::MissingSprite(id))
        }
    }

    fn spec(next_to: &[&str], amplitude: u32, frequency: f64) -> BiomeSpec {
        BiomeSpec {
            next_to: next_to.iter().map(|s| s.to_string()).collect(),
            surface_tiles: SpriteId::Grass as u32,
            sub_surface_tiles: SpriteId::Dirt as u32,
            gen_amplitude: amplitude,
            gen_frequency: frequency,
        }
    }

    fn varied_table() -> BiomeTable {
        BiomeTable::from_specs([
            ("start", spec(&["hills", "rocky"], 2, 1.0)),
            ("hills", spec(&["rocky", "hills"], 6, 2.0)),
            ("rocky", spec(&["hills", "start"], 4, 0.5)),
        ])
    }

    #[test]
    fn first_extend_fills_to_max_margin() {
        let mut grid = RingTileGrid::new();
        let mut gen = BiomeGenerator::new(&varied_table(), &IdentityAtlas, 1000, 1).expect("generator");
        let mut rng = StdRng::seed_from_u64(1);
        let report = gen.extend(&mut grid, 0, &mut rng);
        assert_eq!(report.columns.len(), MAX_GEN_MARGIN as usize);
        assert_eq!(gen.cursor(), MAX_GEN_MARGIN);
        for col in &report.columns {
            assert_eq!(grid.ground_row(col.column), Some(col.ground_row));
        }
    }

    #[test]
    fn no_work_until_trigger_margin() {
        let mut grid = RingTileGrid::new();
        let mut gen = BiomeGenerator::new(&varied_table(), &IdentityAtlas, 1000, 1).expect("generator");
        let mut rng = StdRng::seed_from_u64(1);
        gen.extend(&mut grid, 0, &mut rng);
        assert!(gen.extend(&mut grid, MIN_GEN_MARGIN - 1, &mut rng).is_empty());
        let report = gen.extend(&mut grid, MIN_GEN_MARGIN, &mut rng);
        assert_eq!(report.columns.len(), MIN_GEN_MARGIN as usize);
        assert_eq!(gen.cursor(), MIN_GEN_MARGIN + MAX_GEN_MARGIN);
    }

    #[test]
    fn biomes_switch_every_biome_length() {
        let mut grid = RingTileGrid::new();
        let mut gen = BiomeGenerator::new(&varied_table(), &IdentityAtlas, 1000, 3).expect("generator");
        let mut rng = StdRng::seed_from_u64(3);
        let report = gen.extend(&mut grid, 0, &mut rng);
        let columns: Vec<i64> = report.transitions.iter().map(|t| t.column).collect();
        let expected: Vec<i64> = (1..MAX_GEN_MARGIN / BIOME_LENGTH).map(|k| k * BIOME_LENGTH).collect();
        assert_eq!(columns, expected);
    }

    #[test]
    fn next_biome_comes_from_neighbour_list() {
        let table = varied_table();
        for seed in 0..8 {
            let mut grid = RingTileGrid::new();
            let mut gen = BiomeGenerator::new(&table, &IdentityAtlas, 1000, seed).expect("generator");
            let mut rng = StdRng::seed_from_u64(seed);
            let mut previous = START_BIOME.to_string();
            let mut seen = 0;
            while gen.cursor() < 600 {
                let visible_start = gen.cursor() - MIN_GEN_MARGIN;
                let report = gen.extend(&mut grid, visible_start, &mut rng);
                for t in &report.transitions {
                    assert_eq!(t.from, previous);
                    let neighbours = &table.get(&t.from).expect("known biome").next_to;
                    assert!(neighbours.contains(&t.to), "{} -> {} not adjacent", t.from, t.to);
                    previous = t.to.clone();
                    seen += 1;
                }
                if let Some(last) = report.transitions.last() {
                    assert_eq!(gen.active_biome().kind, last.to);
                    assert_eq!(gen.active_biome().start_column, last.column);
                }
            }
            assert!(seen > 50);
        }
    }

    #[test]
    fn transition_inherits_previous_final_floor() {
        let mut grid = RingTileGrid::new();
        let mut gen = BiomeGenerator::new(&varied_table(), &IdentityAtlas, 1000, 9).expect("generator");
        let mut rng = StdRng::seed_from_u64(9);
        let report = gen.extend(&mut grid, 0, &mut rng);
        assert!(!report.transitions.is_empty());
        for t in &report.transitions {
            let last_of_previous = grid.ground_row(t.column - 1).map(|r| r as i32);
            assert_eq!(last_of_previous, Some(t.floor));
        }
    }

    #[test]
    fn flat_biome_stays_on_baseline() {
        let table = BiomeTable::from_specs([("start", spec(&["start"], 0, 1.0))]);
        let mut grid = RingTileGrid::new();
        let mut gen = BiomeGenerator::new(&table, &IdentityAtlas, 100, 5).expect("generator");
        let mut rng = StdRng::seed_from_u64(5);
        let report = gen.extend(&mut grid, 0, &mut rng);
        assert!(report
            .columns
            .iter()
            .all(|c| c.ground_row == INITIAL_FLOOR_ROW as usize));
    }

    #[test]
    fn past_world_length_is_plateau_without_spawns() {
        let mut grid = RingTileGrid::new();
        let mut gen = BiomeGenerator::new(&varied_table(), &IdentityAtlas, 20, 4).expect("generator");
        let mut rng = StdRng::seed_from_u64(4);
        let report = gen.extend(&mut grid, 0, &mut rng);
        assert!(gen.is_complete());
        let last_floor = grid.ground_row(19).expect("generated");
        for col in report.columns.iter().filter(|c| c.column >= 20) {
            assert_eq!(col.ground_row, last_floor);
        }
        let spawn_limit = 20.0 * TILE_SIZE;
        assert!(report.spawn_points.iter().all(|p| p.x < spawn_limit));
    }

    #[test]
    fn same_seed_same_terrain() {
        let run = |seed: u64| {
            let mut grid = RingTileGrid::new();
            let mut gen = BiomeGenerator::new(&varied_table(), &IdentityAtlas, 1000, seed).expect("generator");
            let mut rng = StdRng::seed_from_u64(seed);
            gen.extend(&mut grid, 0, &mut rng)
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn missing_sprite_is_construction_error() {
        let result = BiomeGenerator::new(&varied_table(), &EmptyAtlas, 100, 0);
        assert!(matches!(result, Err(BiomeConfigError::Sprite { .. })));
    }

    #[test]
    fn spawn_points_stand_on_ground() {
        let mut grid = RingTileGrid::new();
        let mut gen = BiomeGenerator::new(&varied_table(), &IdentityAtlas, 1000, 12).expect("generator");
        let mut rng = StdRng::seed_from_u64(12);
        let report = gen.extend(&mut grid, 0, &mut rng);
        for p in &report.spawn_points {
            let column = (p.x / TILE_SIZE) as i64;
            assert!(column >= SPAWN_SAFE_COLUMNS);
            let below = p.y + TILE_SIZE;
            assert!(grid.collision_at(p.x, below));
            assert!(!grid.collision_at(p.x, p.y));
        }
    }
}
