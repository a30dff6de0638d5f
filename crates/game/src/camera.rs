//! Side-scrolling camera that follows the players' centroid.

use glam::Vec2;
use physics::CameraBounds;
use procgen::{TILE_SIZE, WORLD_BUFFER_HEIGHT};

/// Height of the tile band in world units.
pub const WORLD_HEIGHT_PX: f32 = WORLD_BUFFER_HEIGHT as f32 * TILE_SIZE;

/// Render offset plus viewport size. The offset is the translation applied
/// to world coordinates when drawing, so the view's top-left is `-offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    offset: Vec2,
    viewport: Vec2,
}

impl Camera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            viewport,
        }
    }

    /// Follow the centroid of the living players.
    ///
    /// Horizontally the view only scrolls right, and only while the right
    /// edge has not reached `world_length` columns. Vertically it keeps the
    /// centroid two thirds down the screen unless that would show below the
    /// tile band.
    pub fn update(&mut self, centroid: Option<Vec2>, world_length: i64) {
        let Some(centroid) = centroid else {
            return;
        };
        let new_x = -centroid.x + self.viewport.x / 2.0;
        if new_x < self.offset.x && self.visible_end() < world_length {
            self.offset.x = new_x;
        }
        let new_y = -centroid.y + self.viewport.y * 2.0 / 3.0;
        if WORLD_HEIGHT_PX > -new_y + self.viewport.y {
            self.offset.y = new_y;
        }
    }

    pub fn render_offset(&self) -> Vec2 {
        self.offset
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// World-space top-left of the view.
    pub fn top_left(&self) -> Vec2 {
        -self.offset
    }

    pub fn bottom_right(&self) -> Vec2 {
        -self.offset + self.viewport
    }

    /// First logical column in view.
    pub fn visible_start(&self) -> i64 {
        (-self.offset.x / TILE_SIZE).floor() as i64
    }

    /// Last logical column in view.
    pub fn visible_end(&self) -> i64 {
        self.visible_start() + (self.viewport.x / TILE_SIZE) as i64
    }

    /// Inclusive on every edge.
    pub fn is_inside(&self, p: Vec2) -> bool {
        let (min, max) = (self.top_left(), self.bottom_right());
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }

    /// Horizontal-only containment, for exit checks.
    pub fn is_inside_x(&self, x: f32) -> bool {
        x >= self.top_left().x && x <= self.bottom_right().x
    }

    pub fn bounds(&self, open_left: bool) -> CameraBounds {
        CameraBounds::new(self.top_left(), self.bottom_right()).with_open_left(open_left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(Vec2::new(320.0, 240.0))
    }

    #[test]
    fn scrolls_right_but_never_back() {
        let mut cam = camera();
        cam.update(Some(Vec2::new(400.0, 300.0)), 1000);
        assert_eq!(cam.render_offset().x, -240.0);
        cam.update(Some(Vec2::new(100.0, 300.0)), 1000);
        assert_eq!(cam.render_offset().x, -240.0);
        assert_eq!(cam.visible_start(), 7);
        assert_eq!(cam.visible_end(), 17);
    }

    #[test]
    fn stops_at_end_of_world() {
        let mut cam = camera();
        cam.update(Some(Vec2::new(2000.0, 300.0)), 20);
        let parked = cam.render_offset().x;
        assert!(cam.visible_end() >= 20);
        cam.update(Some(Vec2::new(4000.0, 300.0)), 20);
        assert_eq!(cam.render_offset().x, parked);
    }

    #[test]
    fn vertical_follow_stays_above_band_bottom() {
        let mut cam = camera();
        cam.update(Some(Vec2::new(0.0, 300.0)), 100);
        assert_eq!(cam.render_offset().y, -300.0 + 160.0);
        cam.update(Some(Vec2::new(0.0, WORLD_HEIGHT_PX)), 100);
        assert_eq!(cam.render_offset().y, -140.0);
    }

    #[test]
    fn no_players_leaves_camera_alone() {
        let mut cam = camera();
        cam.update(None, 100);
        assert_eq!(cam.render_offset(), Vec2::ZERO);
    }

    #[test]
    fn inside_tests_are_inclusive() {
        let cam = camera();
        assert!(cam.is_inside(Vec2::new(0.0, 0.0)));
        assert!(cam.is_inside(Vec2::new(320.0, 240.0)));
        assert!(!cam.is_inside(Vec2::new(320.0, 241.0)));
        assert!(cam.is_inside_x(320.0));
        assert!(!cam.is_inside_x(-0.5));
    }
}
