//! Bullets: spawning and per-tick resolution.

use engine_core::{Body, SpriteHandle};
use glam::Vec2;

use crate::camera::Camera;
use crate::entity::{Entity, EntityId, EntityKind};
use crate::registry::EntityRegistry;

pub const PROJECTILE_SPEED: f32 = physics::MAX_VELOCITY;
pub const PROJECTILE_DAMAGE: f32 = 10.0;
pub const PROJECTILE_SIZE: Vec2 = Vec2::new(24.0, 8.0);

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileState {
    pub damage: f32,
    /// Shooter, never damaged by its own shot.
    pub originator: Option<EntityId>,
}

impl ProjectileState {
    pub fn new(damage: f32, originator: Option<EntityId>) -> Self {
        Self { damage, originator }
    }
}

/// Immune, gravity-free bullet with its top-left at `position`.
pub fn spawn_projectile(
    position: Vec2,
    velocity: Vec2,
    originator: Option<EntityId>,
    sprite: Option<SpriteHandle>,
) -> Entity {
    let mut entity = Entity::new(
        EntityKind::Projectile(ProjectileState::new(PROJECTILE_DAMAGE, originator)),
        Body::new(position, PROJECTILE_SIZE).with_velocity(velocity),
    );
    entity.gravity_multiplier = 0.0;
    entity.immune_to_damage = true;
    entity.angle = velocity.y.atan2(velocity.x);
    entity.sprite = sprite;
    entity
}

/// Outcome of resolving one projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileFate {
    /// Hit terrain or left the view.
    Retire,
    Hit { target: EntityId, damage: f32 },
}

/// Decide what happens to every live projectile this tick.
///
/// Runs after the overlap graph is rebuilt. A blocked projectile, or one
/// whose top-left has left the camera on any edge, retires without dealing
/// damage. Otherwise the first eligible
/// entity in its overlap list takes the hit.
pub fn resolve_projectiles(
    registry: &EntityRegistry,
    camera: &Camera,
    friendly_fire: bool,
) -> Vec<(EntityId, ProjectileFate)> {
    let mut fates = Vec::new();
    for entity in registry.iter().filter(|e| e.is_active()) {
        let Some(projectile) = entity.as_projectile() else {
            continue;
        };
        if entity.last_step.is_blocked() || !camera.is_inside(entity.position()) {
            fates.push((entity.id(), ProjectileFate::Retire));
            continue;
        }
        let shooter_is_player = projectile
            .originator
            .and_then(|id| registry.get(id))
            .is_some_and(Entity::is_player);

        let hit = entity.colliding.iter().copied().find(|&other| {
            if Some(other) == projectile.originator {
                return false;
            }
            registry.get(other).is_some_and(|target| {
                !target.immune_to_damage
                    && target.is_active()
                    && (friendly_fire || !(shooter_is_player && target.is_player()))
            })
        });
        if let Some(target) = hit {
            fates.push((
                entity.id(),
                ProjectileFate::Hit {
                    target,
                    damage: projectile.damage,
                },
            ));
        }
    }
    fates
}
