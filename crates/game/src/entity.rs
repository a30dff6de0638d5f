//! The single entity record shared by players, zombies and projectiles.

use engine_core::{Body, Health, SpriteHandle};
use glam::Vec2;
use physics::StepOutcome;

use crate::player::PlayerState;
use crate::projectile::ProjectileState;
use crate::zombie::ZombieBrain;

/// Stable identity assigned by the registry. Never reused within a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// Kind-specific data.
#[derive(Debug, Clone)]
pub enum EntityKind {
    Player(PlayerState),
    Zombie(ZombieBrain),
    Projectile(ProjectileState),
}

/// Common physics and lifecycle fields plus a kind tag.
#[derive(Debug, Clone)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub body: Body,
    /// Facing, in radians from +x.
    pub angle: f32,
    pub health: Health,
    pub gravity_multiplier: f32,
    pub stay_within_camera: bool,
    pub immune_to_damage: bool,
    pub pending_removal: bool,
    /// Entities overlapping this one this tick. Rebuilt every tick.
    pub colliding: Vec<EntityId>,
    /// Result of this tick's physics step.
    pub last_step: StepOutcome,
    pub sprite: Option<SpriteHandle>,
    pub kind: EntityKind,
}

impl Entity {
    /// Unregistered entity with default lifecycle flags.
    pub fn new(kind: EntityKind, body: Body) -> Self {
        Self {
            id: EntityId(0),
            body,
            angle: 0.0,
            health: Health::default(),
            gravity_multiplier: 1.0,
            stay_within_camera: false,
            immune_to_damage: false,
            pending_removal: false,
            colliding: Vec::new(),
            last_step: StepOutcome::default(),
            sprite: None,
            kind,
        }
    }

    pub fn with_sprite(mut self, sprite: SpriteHandle) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player(_))
    }

    pub fn is_zombie(&self) -> bool {
        matches!(self.kind, EntityKind::Zombie(_))
    }

    pub fn is_projectile(&self) -> bool {
        matches!(self.kind, EntityKind::Projectile(_))
    }

    pub fn as_player(&self) -> Option<&PlayerState> {
        match &self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_zombie(&self) -> Option<&ZombieBrain> {
        match &self.kind {
            EntityKind::Zombie(z) => Some(z),
            _ => None,
        }
    }

    pub fn as_projectile(&self) -> Option<&ProjectileState> {
        match &self.kind {
            EntityKind::Projectile(p) => Some(p),
            _ => None,
        }
    }

    /// Apply damage unless immune. Returns whether any was taken.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if self.immune_to_damage {
            return false;
        }
        self.health.take_damage(amount);
        true
    }

    /// Eligible for physics, overlap and AI this tick.
    pub fn is_active(&self) -> bool {
        !self.pending_removal
    }
}
