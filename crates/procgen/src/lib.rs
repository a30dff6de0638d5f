//! Procedural generation for the streamed side-scrolling tile world.

pub mod biome;
pub mod generator;
pub mod terrain;
pub mod tile_grid;

pub use biome::*;
pub use generator::*;
pub use terrain::*;
pub use tile_grid::*;
