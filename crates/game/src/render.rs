//! Draw-list output for the rendering layer.
//!
//! The simulation never draws. It hands the renderer sprite handles with
//! screen-space rectangles, camera offset already applied.

use engine_core::SpriteHandle;
use glam::Vec2;
use procgen::{Tile, TILE_SIZE};

use crate::entity::Entity;

/// One sprite to blit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub sprite: SpriteHandle,
    /// Top-left in screen space.
    pub screen_pos: Vec2,
    pub size: Vec2,
    pub angle: f32,
}

/// Anything that can appear on screen.
pub trait Drawable {
    fn draw_item(&self, offset: Vec2) -> Option<DrawItem>;
}

impl Drawable for Tile {
    fn draw_item(&self, offset: Vec2) -> Option<DrawItem> {
        self.sprite.map(|sprite| DrawItem {
            sprite,
            screen_pos: self.position + offset,
            size: Vec2::splat(TILE_SIZE),
            angle: 0.0,
        })
    }
}

impl Drawable for Entity {
    fn draw_item(&self, offset: Vec2) -> Option<DrawItem> {
        if self.pending_removal {
            return None;
        }
        self.sprite.map(|sprite| DrawItem {
            sprite,
            screen_pos: self.body.position + offset,
            size: self.body.size,
            angle: self.angle,
        })
    }
}

/// Per-player status line for the HUD.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStatus {
    pub name: String,
    pub health: f32,
    pub alive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sky_tiles_are_not_drawn() {
        let sky = Tile {
            position: Vec2::new(64.0, 32.0),
            passable: true,
            sprite: None,
        };
        assert_eq!(sky.draw_item(Vec2::ZERO), None);

        let dirt = Tile {
            sprite: Some(SpriteHandle(0)),
            passable: false,
            ..sky
        };
        let item = dirt.draw_item(Vec2::new(-32.0, 10.0)).expect("solid tile draws");
        assert_eq!(item.screen_pos, Vec2::new(32.0, 42.0));
    }
}
