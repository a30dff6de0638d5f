//! Sprite identifiers and the atlas seam to the rendering layer.
//!
//! The simulation never touches image data. It resolves every [`SpriteId`] it
//! needs to an opaque [`SpriteHandle`] once at construction and stores handles
//! on tiles and entities.

use thiserror::Error;

/// Enumerated sprite sheet entries. Discriminants match the ids used in
/// biome and roster configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SpriteId {
    Dirt = 0,
    Grass = 1,
    Rock = 2,
    Gus = 3,
    Background1 = 4,
    Background2 = 5,
    Background3 = 6,
    Bullet = 7,
    Skull = 8,
    PlayerInfo = 9,
    Clyde = 10,
    Mody = 11,
    Frank = 12,
    Zombie = 13,
}

pub const ALL_SPRITES: [SpriteId; 14] = [
    SpriteId::Dirt,
    SpriteId::Grass,
    SpriteId::Rock,
    SpriteId::Gus,
    SpriteId::Background1,
    SpriteId::Background2,
    SpriteId::Background3,
    SpriteId::Bullet,
    SpriteId::Skull,
    SpriteId::PlayerInfo,
    SpriteId::Clyde,
    SpriteId::Mody,
    SpriteId::Frank,
    SpriteId::Zombie,
];

impl TryFrom<u32> for SpriteId {
    type Error = AssetError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        ALL_SPRITES
            .get(raw as usize)
            .copied()
            .ok_or(AssetError::UnknownSprite(raw))
    }
}

/// Opaque handle owned by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteHandle(pub u32);

/// Resolves sprite ids to handles. A failure is fatal at startup.
pub trait SpriteAtlas {
    fn get_sprite(&self, id: SpriteId) -> Result<SpriteHandle, AssetError>;
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("sprite id {0} does not name a known sprite")]
    UnknownSprite(u32),
    #[error("sprite {0:?} is missing from the atlas")]
    MissingSprite(SpriteId),
}
