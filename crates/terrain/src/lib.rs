//! Terrain: a pure heightmap function and the data derived from it.
//!
//! # Invariants
//! - `height_at` has no hidden state: identical inputs give identical outputs.
//!   Mesh construction, collision, spawn placement and block snapping all
//!   query it independently and must agree.
//! - Nothing here is stored per vertex except the one-time mesh sample grid.

mod heightmap;
mod mesh;
pub mod noise;
mod scenery;

pub use heightmap::{FlatTerrain, Heightmap, Terrain, TerrainConfig, raycast_surface};
pub use mesh::TerrainMesh;
pub use scenery::{Scenery, SceneryConfig, scatter_trees};
