//! One level: tile grid, generator, camera and every entity, advanced one
//! fixed tick at a time.
//!
//! Tick order: removal sweep of last tick's flags, camera, generation,
//! player input, physics, overlap rebuild, zombie AI, projectiles, then
//! death and despawn flags. Nothing inside a tick blocks or fails.

use engine_core::{AssetError, SimClock, SolidQuery, SpriteAtlas, SpriteHandle, SpriteId};
use glam::Vec2;
use input::InputBinding;
use physics::PhysicsWorld;
use procgen::{BiomeConfigError, BiomeGenerator, BiomeTable, RingTileGrid, TILE_SIZE};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use thiserror::Error;

use crate::camera::{Camera, WORLD_HEIGHT_PX};
use crate::config::{GameConfig, Roster};
use crate::entity::{Entity, EntityId, EntityKind};
use crate::player::{apply_input, spawn_player, PlayerState, ShotRequest};
use crate::projectile::{resolve_projectiles, spawn_projectile, ProjectileFate};
use crate::registry::EntityRegistry;
use crate::render::{DrawItem, Drawable, PlayerStatus};
use crate::zombie::{spawn_zombie, Attack, PlayerView};

/// Non-players this many columns behind the view are dropped.
pub const DESPAWN_MARGIN: i64 = 40;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("biome configuration rejected")]
    Biome(#[from] BiomeConfigError),
    #[error("sprite lookup failed")]
    Asset(#[from] AssetError),
    #[error("no character named \"{0}\" in the roster")]
    UnknownCharacter(String),
}

/// How a player left the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerOutcome {
    /// Walked off the left edge once leaving was allowed.
    Done,
    Dead,
}

#[derive(Debug, Clone)]
struct PlayerRecord {
    entity: EntityId,
    name: String,
    outcome: Option<PlayerOutcome>,
}

/// Sprites resolved once at construction.
#[derive(Debug, Clone)]
struct WorldSprites {
    zombie: SpriteHandle,
    bullet: SpriteHandle,
    characters: HashMap<String, SpriteHandle>,
}

pub struct World {
    config: GameConfig,
    seed: u64,
    grid: RingTileGrid,
    generator: BiomeGenerator,
    camera: Camera,
    registry: EntityRegistry,
    physics: PhysicsWorld,
    clock: SimClock,
    rng: StdRng,
    sprites: WorldSprites,
    players: Vec<PlayerRecord>,
    can_leave: bool,
    completion_logged: bool,
}

impl World {
    /// Build the level and generate the opening stretch of terrain.
    pub fn new(
        config: GameConfig,
        table: &BiomeTable,
        roster: &Roster,
        atlas: &dyn SpriteAtlas,
    ) -> Result<Self, WorldError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let generator = BiomeGenerator::new(table, atlas, config.world_length, seed)?;

        let mut characters = HashMap::new();
        for (name, id) in roster.characters() {
            characters.insert(name.to_string(), atlas.get_sprite(id)?);
        }
        let sprites = WorldSprites {
            zombie: atlas.get_sprite(SpriteId::Zombie)?,
            bullet: atlas.get_sprite(SpriteId::Bullet)?,
            characters,
        };

        let mut world = Self {
            camera: Camera::new(Vec2::new(config.viewport_width, config.viewport_height)),
            physics: PhysicsWorld::new(config.gravity),
            clock: SimClock::new(config.tick_rate),
            rng: StdRng::seed_from_u64(seed),
            grid: RingTileGrid::new(),
            registry: EntityRegistry::new(),
            generator,
            sprites,
            players: Vec::new(),
            can_leave: false,
            completion_logged: false,
            seed,
            config,
        };
        world.generate();
        log::info!(
            "World ready: seed {}, {} columns, {} zombies at start",
            world.seed,
            world.config.world_length,
            world.registry.iter().filter(|e| e.is_zombie()).count()
        );
        Ok(world)
    }

    /// Join a roster character at the level start.
    pub fn add_player(&mut self, name: &str, input: InputBinding) -> Result<EntityId, WorldError> {
        let sprite = *self
            .sprites
            .characters
            .get(name)
            .ok_or_else(|| WorldError::UnknownCharacter(name.to_string()))?;
        let seat = self.players.len() as u32;
        let id = self.registry.insert(spawn_player(PlayerState::new(seat, name, input), sprite));
        self.players.push(PlayerRecord {
            entity: id,
            name: name.to_string(),
            outcome: None,
        });
        log::info!("Player {} joined as {:?}", name, id);
        Ok(id)
    }

    /// Insert any prepared entity.
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        self.registry.insert(entity)
    }

    /// Fire a bullet with its top-left at `position`.
    pub fn add_projectile(&mut self, position: Vec2, velocity: Vec2, originator: Option<EntityId>) -> EntityId {
        self.registry.insert(spawn_projectile(
            position,
            velocity,
            originator,
            Some(self.sprites.bullet),
        ))
    }

    /// Advance exactly one tick.
    pub fn update(&mut self) {
        self.clock.advance();
        let now = self.clock.elapsed_ms();

        let removed = self.registry.sweep_pending();
        if !removed.is_empty() {
            log::trace!("Swept {} entities", removed.len());
        }

        let centroid = self.player_centroid();
        self.camera.update(centroid, self.config.world_length);
        if !self.can_leave && self.camera.visible_end() >= self.config.world_length {
            self.can_leave = true;
            log::info!("End of level in view, players may leave");
        }

        self.generate();
        self.update_players(now);
        self.integrate();
        self.registry.rebuild_overlaps();
        self.update_zombies(now);
        self.update_projectiles();
        self.flag_dead_and_lost();

        if !self.completion_logged && !self.players.is_empty() && self.all_players_done_or_dead() {
            self.completion_logged = true;
            log::info!("All players done or dead after {} ticks", self.clock.tick());
        }
    }

    fn generate(&mut self) {
        let visible_start = self.camera.visible_start();
        let report = self.generator.extend(&mut self.grid, visible_start, &mut self.rng);
        if !self.config.spawn_zombies {
            return;
        }
        for point in report.spawn_points {
            let zombie = spawn_zombie(point, self.sprites.zombie, &mut self.rng);
            self.registry.insert(zombie);
        }
    }

    fn player_centroid(&self) -> Option<Vec2> {
        let centers: Vec<Vec2> = self
            .registry
            .iter()
            .filter(|e| e.is_active() && e.as_player().is_some_and(|p| p.alive))
            .map(|e| e.body.center())
            .collect();
        (!centers.is_empty()).then(|| centers.iter().copied().sum::<Vec2>() / centers.len() as f32)
    }

    fn update_players(&mut self, now: u64) {
        let mut shots: Vec<(EntityId, ShotRequest)> = Vec::new();
        let mut done: Vec<EntityId> = Vec::new();
        for entity in self.registry.iter_mut().filter(|e| e.is_active()) {
            let id = entity.id;
            let Entity { body, angle, kind, .. } = entity;
            let EntityKind::Player(state) = kind else {
                continue;
            };
            if !self.camera.is_inside_x(body.position.x) {
                done.push(id);
                continue;
            }
            let snapshot = state.input.snapshot();
            if let Some(shot) = apply_input(body, angle, state, &snapshot, &self.grid, now) {
                shots.push((id, shot));
            }
        }

        for id in done {
            self.retire_player(id, PlayerOutcome::Done);
        }
        for (shooter, shot) in shots {
            self.add_projectile(shot.position, shot.velocity, Some(shooter));
        }
    }

    fn integrate(&mut self) {
        let bounds = self.camera.bounds(self.can_leave);
        for entity in self.registry.iter_mut().filter(|e| e.is_active()) {
            self.physics.apply_gravity(&mut entity.body, entity.gravity_multiplier);
            let clamp = entity.stay_within_camera.then_some(&bounds);
            entity.last_step = self.physics.step(&mut entity.body, &self.grid, clamp);
        }
    }

    fn update_zombies(&mut self, now: u64) {
        let players: Vec<PlayerView> = self
            .registry
            .iter()
            .filter(|e| e.is_active() && e.as_player().is_some_and(|p| p.alive))
            .map(|e| PlayerView {
                id: e.id,
                position: e.body.position,
            })
            .collect();

        let mut attacks: Vec<Attack> = Vec::new();
        for entity in self.registry.iter_mut().filter(|e| e.is_active()) {
            let Entity { body, kind, .. } = entity;
            if let EntityKind::Zombie(brain) = kind {
                attacks.extend(brain.think(body, &players, now));
            }
        }

        for attack in attacks {
            if let Some(target) = self.registry.get_mut(attack.target) {
                target.apply_damage(attack.damage);
                log::debug!(
                    "{:?} hit for {}, {} left",
                    attack.target,
                    attack.damage,
                    target.health.current
                );
            }
        }
    }

    fn update_projectiles(&mut self) {
        let fates = resolve_projectiles(&self.registry, &self.camera, self.config.friendly_fire);
        for (projectile, fate) in fates {
            if let ProjectileFate::Hit { target, damage } = fate {
                if let Some(target) = self.registry.get_mut(target) {
                    target.apply_damage(damage);
                }
            }
            if let Some(p) = self.registry.get_mut(projectile) {
                p.pending_removal = true;
            }
        }
    }

    fn flag_dead_and_lost(&mut self) {
        let despawn_x = (self.camera.visible_start() - DESPAWN_MARGIN) as f32 * TILE_SIZE;
        let mut dead_players = Vec::new();
        for entity in self.registry.iter_mut().filter(|e| e.is_active()) {
            let fell_out = entity.body.position.y > WORLD_HEIGHT_PX;
            let dead = entity.health.is_dead() || fell_out;
            if entity.is_player() {
                if dead {
                    dead_players.push(entity.id);
                }
            } else if dead || entity.body.position.x + entity.body.size.x < despawn_x {
                entity.pending_removal = true;
            }
        }
        for id in dead_players {
            self.retire_player(id, PlayerOutcome::Dead);
        }
    }

    fn retire_player(&mut self, id: EntityId, outcome: PlayerOutcome) {
        if let Some(entity) = self.registry.get_mut(id) {
            entity.pending_removal = true;
            if let EntityKind::Player(state) = &mut entity.kind {
                state.alive = outcome != PlayerOutcome::Dead;
            }
        }
        if let Some(record) = self.players.iter_mut().find(|r| r.entity == id) {
            if record.outcome.is_none() {
                log::info!("Player {} is {:?}", record.name, outcome);
                record.outcome = Some(outcome);
            }
        }
    }

    /// Point query against the tile grid.
    pub fn is_world_collision(&self, x: f32, y: f32) -> bool {
        self.grid.is_solid(x, y)
    }

    pub fn camera_render_offset(&self) -> Vec2 {
        self.camera.render_offset()
    }

    /// True once every joined player has left or died. Vacuously true with no players.
    pub fn all_players_done_or_dead(&self) -> bool {
        self.players.iter().all(|r| r.outcome.is_some())
    }

    pub fn can_leave(&self) -> bool {
        self.can_leave
    }

    pub fn player_outcome(&self, id: EntityId) -> Option<PlayerOutcome> {
        self.players.iter().find(|r| r.entity == id).and_then(|r| r.outcome)
    }

    pub fn player_statuses(&self) -> Vec<PlayerStatus> {
        self.players
            .iter()
            .map(|r| {
                let health = self.registry.get(r.entity).map_or(0.0, |e| e.health.current);
                PlayerStatus {
                    name: r.name.clone(),
                    health,
                    alive: r.outcome != Some(PlayerOutcome::Dead),
                }
            })
            .collect()
    }

    /// Visible tiles then entities, in screen space.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let offset = self.camera.render_offset();
        let mut items = Vec::new();
        for column in self.camera.visible_start()..=self.camera.visible_end() + 1 {
            if self.grid.resident_column(column) != column {
                continue;
            }
            items.extend(self.grid.column(column).iter().filter_map(|t| t.draw_item(offset)));
        }
        items.extend(self.registry.iter().filter_map(|e| e.draw_item(offset)));
        items
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &RingTileGrid {
        &self.grid
    }

    pub fn generator(&self) -> &BiomeGenerator {
        &self.generator
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.registry.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.registry.get_mut(id)
    }

    /// Overwrite one grid cell, for scripted obstacles.
    pub fn set_tile(&mut self, column: i64, row: usize, solid: Option<SpriteHandle>) {
        self.grid.set_tile(column, row, solid.is_none(), solid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Body;
    use input::InputSlot;
    use procgen::BiomeSpec;

    struct IdentityAtlas;

    impl SpriteAtlas for IdentityAtlas {
        fn get_sprite(&self, id: SpriteId) -> Result<SpriteHandle, AssetError> {
            Ok(SpriteHandle(id as u32))
        }
    }

    fn flat_table() -> BiomeTable {
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

    fn roster() -> Roster {
        Roster::from_ron_str(r#"(models: {"Gus": 3})"#).expect("roster")
    }

    fn world() -> World {
        let config = GameConfig {
            seed: Some(1),
            spawn_zombies: false,
            ..GameConfig::default()
        };
        World::new(config, &flat_table(), &roster(), &IdentityAtlas).expect("world")
    }

    #[test]
    fn construction_generates_opening_terrain() {
        let w = world();
        assert_eq!(w.generator().cursor(), procgen::MAX_GEN_MARGIN);
        assert!(w.is_world_collision(10.0, 15.0 * TILE_SIZE));
        assert!(!w.is_world_collision(10.0, 14.0 * TILE_SIZE));
    }

    #[test]
    fn unknown_character_rejected() {
        let mut w = world();
        assert!(matches!(
            w.add_player("Nobody", InputSlot::binding()),
            Err(WorldError::UnknownCharacter(name)) if name == "Nobody"
        ));
    }

    #[test]
    fn player_lands_on_flat_ground() {
        let mut w = world();
        let id = w.add_player("Gus", InputSlot::binding()).expect("join");
        for _ in 0..240 {
            w.update();
        }
        let body = w.entity(id).map(|e| e.body).expect("player alive");
        let floor = 15.0 * TILE_SIZE;
        assert!(body.position.y + body.size.y < floor);
        assert!(body.position.y + body.size.y > floor - 1.0);
        assert!(!w.all_players_done_or_dead());
    }

    #[test]
    fn dead_player_counts_as_finished() {
        let mut w = world();
        let id = w.add_player("Gus", InputSlot::binding()).expect("join");
        if let Some(e) = w.entity_mut(id) {
            e.health.take_damage(1000.0);
        }
        w.update();
        assert_eq!(w.player_outcome(id), Some(PlayerOutcome::Dead));
        assert!(w.all_players_done_or_dead());
        w.update();
        assert!(w.entity(id).is_none());
        assert!(w.all_players_done_or_dead());
        assert!(!w.player_statuses()[0].alive);
    }

    #[test]
    fn flagged_zombie_gets_no_physics_or_ai() {
        let mut w = world();
        let player = w.add_player("Gus", InputSlot::binding()).expect("join");
        let start = w.entity(player).map(|e| e.body.position).expect("player");
        let zombie = w.add_entity(Entity::new(
            EntityKind::Zombie(crate::zombie::ZombieBrain::with_stats(1.5, 500.0)),
            Body::new(start + Vec2::new(40.0, 0.0), Vec2::splat(31.0)).with_velocity(Vec2::new(3.0, -2.0)),
        ));
        let before = w.entity(zombie).map(|e| e.body).expect("zombie");
        if let Some(e) = w.entity_mut(zombie) {
            e.pending_removal = true;
        }

        w.integrate();
        w.registry.rebuild_overlaps();
        w.update_zombies(1000);

        let z = w.entity(zombie).expect("kept until the sweep");
        assert_eq!(z.body, before);
        assert_eq!(z.as_zombie().and_then(|b| b.target), None);
        assert!(z.colliding.is_empty());

        w.update();
        assert!(w.entity(zombie).is_none());
    }

    #[test]
    fn draw_list_offsets_by_camera() {
        let mut w = world();
        w.add_player("Gus", InputSlot::binding()).expect("join");
        w.update();
        let offset = w.camera_render_offset();
        let items = w.draw_list();
        let gus = items
            .iter()
            .find(|i| i.sprite == SpriteHandle(SpriteId::Gus as u32))
            .expect("player drawn");
        let player = w.entities().iter().find(|e| e.is_player()).expect("player");
        assert_eq!(gus.screen_pos, player.body.position + offset);
        assert!(items.iter().any(|i| i.sprite == SpriteHandle(SpriteId::Grass as u32)));
    }
}
