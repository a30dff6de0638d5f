//! Core engine types and utilities.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Axis-aligned bodies and the point-collision seam
//! - Health and AI state components
//! - Sprite identifiers and the atlas lookup seam
//! - Simulation and wall-clock time

pub mod body;
pub mod collision;
pub mod components;
pub mod sprite;
pub mod time;

pub use body::*;
pub use collision::*;
pub use components::*;
pub use sprite::*;
pub use time::*;

// Re-export commonly used types
pub use glam::Vec2;
