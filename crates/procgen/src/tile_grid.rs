//! Fixed-capacity ring of tile columns.
//!
//! The grid holds [`WORLD_BUFFER_LEN`] columns of a much longer logical world.
//! Logical column `c` lives in slot [`to_slot`]`(c)`, so `c` and
//! `c + WORLD_BUFFER_LEN` share storage and a column is recycled once the
//! generator writes past it. Every reader and writer goes through `to_slot`.

use engine_core::{SolidQuery, SpriteHandle};
use glam::Vec2;

/// Square tile edge in world units.
pub const TILE_SIZE: f32 = 32.0;
/// Number of columns held at once.
pub const WORLD_BUFFER_LEN: usize = 120;
/// Number of rows in every column.
pub const WORLD_BUFFER_HEIGHT: usize = 30;

/// Storage slot for a logical column.
#[inline]
pub fn to_slot(column: i64) -> usize {
    column.rem_euclid(WORLD_BUFFER_LEN as i64) as usize
}

/// Logical column containing world-space `x`.
#[inline]
pub fn world_to_column(x: f32) -> i64 {
    (x / TILE_SIZE).floor() as i64
}

/// Row containing world-space `y`, or `None` above or below the buffer.
#[inline]
pub fn world_to_row(y: f32) -> Option<usize> {
    if y < 0.0 {
        return None;
    }
    let row = (y / TILE_SIZE).floor() as usize;
    (row < WORLD_BUFFER_HEIGHT).then_some(row)
}

/// One grid cell. `sprite == None` means sky.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    /// Top-left corner in world space.
    pub position: Vec2,
    pub passable: bool,
    pub sprite: Option<SpriteHandle>,
}

impl Tile {
    fn sky(column: i64, row: usize) -> Self {
        Self {
            position: cell_origin(column, row),
            passable: true,
            sprite: None,
        }
    }

    pub fn is_sky(&self) -> bool {
        self.passable && self.sprite.is_none()
    }
}

fn cell_origin(column: i64, row: usize) -> Vec2 {
    Vec2::new(column as f32 * TILE_SIZE, row as f32 * TILE_SIZE)
}

/// How to fill a freshly generated column.
#[derive(Debug, Clone, Copy)]
pub struct ColumnFill {
    /// First solid row; everything above is sky.
    pub ground_row: usize,
    pub surface: SpriteHandle,
    pub subsurface: SpriteHandle,
}

/// Column-major ring buffer of tiles.
#[derive(Debug, Clone)]
pub struct RingTileGrid {
    tiles: Vec<Tile>,
    /// Logical column currently stored in each slot.
    resident: Vec<i64>,
}

impl Default for RingTileGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl RingTileGrid {
    /// All-sky grid with slot `s` holding logical column `s`.
    pub fn new() -> Self {
        let mut tiles = Vec::with_capacity(WORLD_BUFFER_LEN * WORLD_BUFFER_HEIGHT);
        for slot in 0..WORLD_BUFFER_LEN {
            for row in 0..WORLD_BUFFER_HEIGHT {
                tiles.push(Tile::sky(slot as i64, row));
            }
        }
        Self {
            tiles,
            resident: (0..WORLD_BUFFER_LEN as i64).collect(),
        }
    }

    #[inline]
    fn index(slot: usize, row: usize) -> usize {
        slot * WORLD_BUFFER_HEIGHT + row
    }

    /// Tile for a logical column and row. Rows outside the buffer give `None`.
    pub fn tile(&self, column: i64, row: usize) -> Option<&Tile> {
        (row < WORLD_BUFFER_HEIGHT).then(|| &self.tiles[Self::index(to_slot(column), row)])
    }

    /// Every row of the slot backing `column`, top to bottom.
    pub fn column(&self, column: i64) -> &[Tile] {
        let start = Self::index(to_slot(column), 0);
        &self.tiles[start..start + WORLD_BUFFER_HEIGHT]
    }

    /// Logical column last written into the slot backing `column`.
    pub fn resident_column(&self, column: i64) -> i64 {
        self.resident[to_slot(column)]
    }

    /// First impassable row of `column`, if any.
    pub fn ground_row(&self, column: i64) -> Option<usize> {
        self.column(column).iter().position(|t| !t.passable)
    }

    /// True iff the tile under the point is impassable. Open above and below.
    pub fn collision_at(&self, x: f32, y: f32) -> bool {
        match world_to_row(y) {
            Some(row) => {
                let slot = to_slot(world_to_column(x));
                !self.tiles[Self::index(slot, row)].passable
            }
            None => false,
        }
    }

    /// Overwrite the slot backing `column` and relabel it with `column`'s world x.
    pub fn write_column(&mut self, column: i64, fill: &ColumnFill) {
        let slot = to_slot(column);
        self.resident[slot] = column;
        for row in 0..WORLD_BUFFER_HEIGHT {
            let tile = &mut self.tiles[Self::index(slot, row)];
            tile.position = cell_origin(column, row);
            if row < fill.ground_row {
                tile.passable = true;
                tile.sprite = None;
            } else if row == fill.ground_row {
                tile.passable = false;
                tile.sprite = Some(fill.surface);
            } else {
                tile.passable = false;
                tile.sprite = Some(fill.subsurface);
            }
        }
    }

    /// Rewrite a single cell in place. Rows outside the buffer are ignored.
    pub fn set_tile(&mut self, column: i64, row: usize, passable: bool, sprite: Option<SpriteHandle>) {
        if row >= WORLD_BUFFER_HEIGHT {
            return;
        }
        let slot = to_slot(column);
        self.resident[slot] = column;
        let tile = &mut self.tiles[Self::index(slot, row)];
        tile.position = cell_origin(column, row);
        tile.passable = passable;
        tile.sprite = sprite;
    }
}

impl SolidQuery for RingTileGrid {
    fn is_solid(&self, x: f32, y: f32) -> bool {
        self.collision_at(x, y)
    }
}
