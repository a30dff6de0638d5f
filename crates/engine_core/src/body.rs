//! Axis-aligned boxes and the kinematic body every entity carries.

use glam::Vec2;

/// Axis-aligned bounding box anchored at its top-left corner (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Bottom-right corner.
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [Vec2; 4] {
        let max = self.max();
        [
            self.min,
            Vec2::new(max.x, self.min.y),
            Vec2::new(self.min.x, max.y),
            max,
        ]
    }

    /// Inclusive on every edge.
    pub fn contains_point(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x <= max.x && p.y >= self.min.y && p.y <= max.y
    }

    /// True when any corner of either box lies inside the other.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.corners().iter().any(|c| other.contains_point(*c))
            || other.corners().iter().any(|c| self.contains_point(*c))
    }
}

/// Position, size and per-tick velocity of a simulated object.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Body {
    /// Top-left corner in world space.
    pub position: Vec2,
    pub size: Vec2,
    /// World units per tick.
    pub velocity: Vec2,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            velocity: Vec2::ZERO,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    pub fn add_velocity(&mut self, delta: Vec2) {
        self.velocity += delta;
    }
}
