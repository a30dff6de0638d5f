//! Camera clamping and pairwise overlap detection.

use engine_core::Aabb;
use glam::Vec2;

/// World-space rectangle a camera-bound body may not leave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBounds {
    pub min: Vec2,
    pub max: Vec2,
    /// Leaving past the left edge is allowed once the level can be exited.
    pub open_left: bool,
}

impl CameraBounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min,
            max,
            open_left: false,
        }
    }

    pub fn with_open_left(mut self, open_left: bool) -> Self {
        self.open_left = open_left;
        self
    }

    /// True if a body touching `p` would break the clamp.
    pub fn violates(&self, p: Vec2) -> bool {
        if p.x < self.min.x && !self.open_left {
            return true;
        }
        p.x > self.max.x || p.y < self.min.y || p.y > self.max.y
    }
}

/// Every unordered pair of overlapping boxes, as index pairs `(i, j)` with `i < j`.
/// `None` entries are skipped.
pub fn overlapping_pairs(boxes: &[Option<Aabb>]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, a) in boxes.iter().enumerate() {
        let Some(a) = a else { continue };
        for (j, b) in boxes.iter().enumerate().skip(i + 1) {
            if let Some(b) = b {
                if a.overlaps(b) {
                    pairs.push((i, j));
                }
            }
        }
    }
    pairs
}
