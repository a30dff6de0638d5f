//! Overrun: a streamed side-scrolling zombie world, simulated headlessly.
//!
//! [`World`] owns the level. Drive it with [`World::update`] once per fixed
//! tick and read [`World::draw_list`] to render.

pub mod camera;
pub mod config;
pub mod entity;
pub mod player;
pub mod projectile;
pub mod registry;
pub mod render;
pub mod world;
pub mod zombie;

pub use camera::Camera;
pub use config::{GameConfig, Roster, RosterError};
pub use entity::{Entity, EntityId, EntityKind};
pub use registry::EntityRegistry;
pub use render::{DrawItem, Drawable, PlayerStatus};
pub use world::{PlayerOutcome, World, WorldError};
