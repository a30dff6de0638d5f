//! Gravity, velocity limits and the per-axis integration step.

use engine_core::{Body, SolidQuery};
use glam::Vec2;

use crate::collision::CameraBounds;

/// Speed limit on either axis, in world units per tick.
pub const MAX_VELOCITY: f32 = 12.0;
/// Downward acceleration per tick for a gravity multiplier of 1.
pub const DEFAULT_GRAVITY: f32 = 0.25;

/// Clamp each component to `[-MAX_VELOCITY, MAX_VELOCITY]`.
pub fn clamp_velocity(v: Vec2) -> Vec2 {
    v.clamp(Vec2::splat(-MAX_VELOCITY), Vec2::splat(MAX_VELOCITY))
}

/// Which axes were stopped during a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub blocked_x: bool,
    pub blocked_y: bool,
}

impl StepOutcome {
    pub fn is_blocked(&self) -> bool {
        self.blocked_x || self.blocked_y
    }
}

/// Global physics parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsWorld {
    pub gravity: f32,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVITY)
    }
}

impl PhysicsWorld {
    pub fn new(gravity: f32) -> Self {
        Self { gravity }
    }

    pub fn apply_gravity(&self, body: &mut Body, multiplier: f32) {
        body.velocity.y += self.gravity * multiplier;
    }

    /// Clamp, then move horizontally and vertically in that order.
    ///
    /// Each axis tests the two corners on its leading edge. A solid tile or,
    /// when `bounds` is given, a camera violation zeroes that axis's velocity
    /// and leaves its position unchanged.
    pub fn step<S: SolidQuery + ?Sized>(
        &self,
        body: &mut Body,
        solid: &S,
        bounds: Option<&CameraBounds>,
    ) -> StepOutcome {
        body.velocity = clamp_velocity(body.velocity);
        let mut outcome = StepOutcome::default();
        let blocked = |p: Vec2| solid.is_solid(p.x, p.y) || bounds.is_some_and(|b| b.violates(p));

        let vx = body.velocity.x;
        if vx != 0.0 {
            let lead = body.position.x + vx + if vx > 0.0 { body.size.x } else { 0.0 };
            let top = Vec2::new(lead, body.position.y);
            let bottom = Vec2::new(lead, body.position.y + body.size.y);
            if blocked(top) || blocked(bottom) {
                body.velocity.x = 0.0;
                outcome.blocked_x = true;
            } else {
                body.position.x += vx;
            }
        }

        let vy = body.velocity.y;
        if vy != 0.0 {
            let lead = body.position.y + vy + if vy > 0.0 { body.size.y } else { 0.0 };
            let left = Vec2::new(body.position.x, lead);
            let right = Vec2::new(body.position.x + body.size.x, lead);
            if blocked(left) || blocked(right) {
                body.velocity.y = 0.0;
                outcome.blocked_y = true;
            } else {
                body.position.y += vy;
            }
        }

        outcome
    }
}
