//! Player characters and per-tick input application.

use engine_core::{Body, SolidQuery, SpriteHandle};
use glam::Vec2;
use input::{Button, InputBinding, InputSnapshot};

use crate::entity::{Entity, EntityKind};
use crate::projectile::{PROJECTILE_SIZE, PROJECTILE_SPEED};
use procgen::TILE_SIZE;

pub const PLAYER_START: Vec2 = Vec2::new(TILE_SIZE, TILE_SIZE * 10.0);
pub const PLAYER_SIZE: Vec2 = Vec2::new(TILE_SIZE, TILE_SIZE);
pub const WALK_SPEED: f32 = 5.0;
pub const JUMP_IMPULSE: f32 = -8.5;
/// How far below the feet counts as standing on ground.
pub const GROUND_PROBE: f32 = 2.0;
pub const FIRE_INTERVAL_MS: u64 = 250;
/// Stick deflection needed to aim or turn.
pub const AIM_DEAD_ZONE: f32 = 0.2;

#[derive(Debug, Clone)]
pub struct PlayerState {
    /// Seat number in join order.
    pub seat: u32,
    pub name: String,
    pub input: InputBinding,
    pub alive: bool,
    pub last_shot_ms: Option<u64>,
    pub fire_interval_ms: u64,
    /// Unit aim used when the stick is centred.
    pub facing: Vec2,
}

impl PlayerState {
    pub fn new(seat: u32, name: impl Into<String>, input: InputBinding) -> Self {
        Self {
            seat,
            name: name.into(),
            input,
            alive: true,
            last_shot_ms: None,
            fire_interval_ms: FIRE_INTERVAL_MS,
            facing: Vec2::X,
        }
    }

    pub fn can_fire(&self, now_ms: u64) -> bool {
        self.last_shot_ms
            .map_or(true, |last| now_ms >= last + self.fire_interval_ms)
    }
}

/// A player at the level start, clamped to the camera.
pub fn spawn_player(state: PlayerState, sprite: SpriteHandle) -> Entity {
    let mut entity = Entity::new(EntityKind::Player(state), Body::new(PLAYER_START, PLAYER_SIZE)).with_sprite(sprite);
    entity.stay_within_camera = true;
    entity
}

/// A shot the player wants fired this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRequest {
    /// Projectile top-left.
    pub position: Vec2,
    pub velocity: Vec2,
}

/// True if solid ground lies just under either bottom corner.
pub fn is_grounded<S: SolidQuery + ?Sized>(body: &Body, solid: &S) -> bool {
    let probe_y = body.position.y + body.size.y + GROUND_PROBE;
    solid.is_solid(body.position.x, probe_y) || solid.is_solid(body.position.x + body.size.x, probe_y)
}

/// Turn one input snapshot into velocity changes and an optional shot.
pub fn apply_input<S: SolidQuery + ?Sized>(
    body: &mut Body,
    angle: &mut f32,
    state: &mut PlayerState,
    input: &InputSnapshot,
    solid: &S,
    now_ms: u64,
) -> Option<ShotRequest> {
    let axes = input.get_axes();
    if input.is_button_pressed(Button::Hold) {
        body.velocity.x = 0.0;
    } else {
        body.velocity.x = WALK_SPEED * axes.x;
    }

    if input.is_button_pressed(Button::Jump) && is_grounded(body, solid) {
        body.velocity.y += JUMP_IMPULSE;
    }

    if axes.length() > AIM_DEAD_ZONE {
        state.facing = axes.normalize();
        *angle = state.facing.y.atan2(state.facing.x);
    }

    if !input.is_button_pressed(Button::Fire) || !state.can_fire(now_ms) {
        return None;
    }
    state.last_shot_ms = Some(now_ms);
    Some(ShotRequest {
        position: body.center() - PROJECTILE_SIZE * 0.5,
        velocity: state.facing * PROJECTILE_SPEED,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::InputSlot;

    struct FlatGround(f32);

    impl SolidQuery for FlatGround {
        fn is_solid(&self, _x: f32, y: f32) -> bool {
            y >= self.0
        }
    }

    fn state() -> PlayerState {
        PlayerState::new(0, "Gus", InputSlot::binding())
    }

    fn standing() -> Body {
        // Feet one unit above the floor at y = 100.
        Body::new(Vec2::new(0.0, 100.0 - PLAYER_SIZE.y - 1.0), PLAYER_SIZE)
    }

    #[test]
    fn walk_follows_stick_unless_held() {
        let (mut body, mut angle, mut st) = (standing(), 0.0, state());
        let snap = InputSnapshot::new().with_axes(0.5, 0.0);
        apply_input(&mut body, &mut angle, &mut st, &snap, &FlatGround(1000.0), 0);
        assert_eq!(body.velocity.x, 2.5);

        let held = snap.with_button(Button::Hold);
        apply_input(&mut body, &mut angle, &mut st, &held, &FlatGround(1000.0), 0);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn jump_only_when_grounded() {
        let snap = InputSnapshot::new().with_button(Button::Jump);
        let (mut angle, mut st) = (0.0, state());

        let mut body = standing();
        apply_input(&mut body, &mut angle, &mut st, &snap, &FlatGround(100.0), 0);
        assert_eq!(body.velocity.y, JUMP_IMPULSE);

        let mut airborne = standing();
        apply_input(&mut airborne, &mut angle, &mut st, &snap, &FlatGround(200.0), 0);
        assert_eq!(airborne.velocity.y, 0.0);
    }

    #[test]
    fn fire_respects_interval_and_facing() {
        let (mut body, mut angle, mut st) = (standing(), 0.0, state());
        let ground = FlatGround(100.0);
        let fire = InputSnapshot::new().with_button(Button::Fire);

        let shot = apply_input(&mut body, &mut angle, &mut st, &fire, &ground, 1000).expect("first shot");
        assert_eq!(shot.velocity, Vec2::new(PROJECTILE_SPEED, 0.0));
        assert_eq!(shot.position + PROJECTILE_SIZE * 0.5, body.center());

        assert!(apply_input(&mut body, &mut angle, &mut st, &fire, &ground, 1100).is_none());

        let aim_left = fire.clone().with_axes(-1.0, 0.0);
        let shot = apply_input(&mut body, &mut angle, &mut st, &aim_left, &ground, 1250).expect("after interval");
        assert_eq!(shot.velocity, Vec2::new(-PROJECTILE_SPEED, 0.0));
        assert_eq!(st.facing, Vec2::new(-1.0, 0.0));
    }
}
