//! Zombie pursuit AI.
//!
//! A zombie listens for the nearest player within its hearing distance
//! (Manhattan distance between top-left corners), walks toward it, and once
//! horizontally within attack range stands still and strikes on a cooldown.
//! A target is kept until it leaves the world or dies, even if it moves out
//! of earshot or another player comes closer.

use engine_core::{AIState, Body, Health, SpriteHandle};
use glam::Vec2;
use rand::Rng;

use crate::entity::{Entity, EntityId, EntityKind};
use procgen::TILE_SIZE;

pub const ZOMBIE_SIZE: f32 = TILE_SIZE - 1.0;
pub const ZOMBIE_HEALTH: f32 = 100.0;
pub const BASE_SPEED: f32 = 1.5;
pub const BASE_HEARING: f32 = 10.0 * TILE_SIZE;
pub const ATTACK_DISTANCE: f32 = TILE_SIZE / 2.0;
pub const VERTICAL_TOLERANCE: f32 = TILE_SIZE / 2.0;
pub const ATTACK_COOLDOWN_MS: u64 = 1000;
pub const ATTACK_DAMAGE: f32 = 25.0;

/// What a zombie may perceive about a player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub id: EntityId,
    pub position: Vec2,
}

/// Damage a zombie wants to deal this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attack {
    pub target: EntityId,
    pub damage: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZombieBrain {
    pub state: AIState,
    /// Held by id; resolved against the live players every tick.
    pub target: Option<EntityId>,
    pub speed: f32,
    pub hearing_distance: f32,
    pub attack_distance: f32,
    pub vertical_tolerance: f32,
    pub attack_cooldown_ms: u64,
    pub attack_damage: f32,
    /// Set on first contact; damage needs a full cooldown after it.
    pub last_attack_ms: Option<u64>,
}

impl ZombieBrain {
    /// Baseline zombie with randomised speed and hearing.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let speed = BASE_SPEED + rng.gen_range(0..100) as f32 / 75.0;
        let hearing = BASE_HEARING + rng.gen_range(0..(8 * TILE_SIZE as u32)) as f32;
        Self::with_stats(speed, hearing)
    }

    pub fn with_stats(speed: f32, hearing_distance: f32) -> Self {
        Self {
            state: AIState::Searching,
            target: None,
            speed,
            hearing_distance,
            attack_distance: ATTACK_DISTANCE,
            vertical_tolerance: VERTICAL_TOLERANCE,
            attack_cooldown_ms: ATTACK_COOLDOWN_MS,
            attack_damage: ATTACK_DAMAGE,
            last_attack_ms: None,
        }
    }

    fn nearest_audible(&self, from: Vec2, players: &[PlayerView]) -> Option<EntityId> {
        players
            .iter()
            .map(|p| (p.id, (p.position.x - from.x).abs() + (p.position.y - from.y).abs()))
            .filter(|&(_, dist)| dist <= self.hearing_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Run one AI step. Writes horizontal velocity into `body` and returns
    /// an attack when one is due.
    pub fn think(&mut self, body: &mut Body, players: &[PlayerView], now_ms: u64) -> Option<Attack> {
        if let Some(target) = self.target {
            if !players.iter().any(|p| p.id == target) {
                log::debug!("Zombie lost target {:?}", target);
                self.target = None;
                self.last_attack_ms = None;
                self.state = AIState::Searching;
                body.velocity.x = 0.0;
            }
        }

        if self.target.is_none() {
            self.target = self.nearest_audible(body.position, players);
        }
        let Some(target_id) = self.target else {
            self.state = AIState::Searching;
            return None;
        };
        let target = players.iter().find(|p| p.id == target_id)?;

        let dx = body.position.x - target.position.x;
        let dy = (body.position.y - target.position.y).abs();
        if dx < -self.attack_distance {
            self.state = AIState::Pursuing;
            body.velocity.x = self.speed;
            return None;
        }
        if dx > self.attack_distance {
            self.state = AIState::Pursuing;
            body.velocity.x = -self.speed;
            return None;
        }

        self.state = AIState::Attacking;
        body.velocity.x = 0.0;
        if dy >= self.vertical_tolerance {
            return None;
        }
        let last = *self.last_attack_ms.get_or_insert(now_ms);
        if now_ms > last + self.attack_cooldown_ms {
            self.last_attack_ms = Some(now_ms);
            return Some(Attack {
                target: target_id,
                damage: self.attack_damage,
            });
        }
        None
    }
}

/// A fresh zombie standing with its top-left at `position`.
pub fn spawn_zombie<R: Rng + ?Sized>(position: Vec2, sprite: SpriteHandle, rng: &mut R) -> Entity {
    let mut entity = Entity::new(
        EntityKind::Zombie(ZombieBrain::new(rng)),
        Body::new(position, Vec2::splat(ZOMBIE_SIZE)),
    )
    .with_sprite(sprite);
    entity.health = Health::new(ZOMBIE_HEALTH);
    entity
}
