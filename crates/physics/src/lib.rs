//! Kinematic tile physics for the side-scrolling world.
//!
//! Bodies move one axis at a time against a [`engine_core::SolidQuery`], so a
//! body blocked on one axis still slides along the other.

pub mod collision;
pub mod physics_world;

pub use collision::*;
pub use physics_world::*;
