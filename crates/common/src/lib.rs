//! Shared types: grid cells, block materials, axis-aligned boxes and rays.
//!
//! # Invariants
//! - A block at cell `(x, y, z)` occupies `[x, x+1] x [y, y+1] x [z, z+1]`.
//! - Box overlap is strict: touching faces do not intersect.

pub mod error;
pub mod geometry;
pub mod types;

pub use error::{ConfigError, ParseMaterialError};
pub use geometry::{Aabb, Ray};
pub use types::{BlockPos, Material};
