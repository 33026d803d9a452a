//! World Kernel: player kinematics, placed-block colliders and pointer picking.
//!
//! # Invariants
//! - `World::step` is a deterministic function of the current state and the
//!   frame's `FrameInput`.
//! - Block mutations flow through `BlockStore` and each one is logged.
//! - Player feet never end an update below `max(terrain height, water level)`.

mod blocks;
mod camera;
mod config;
mod physics;
mod picking;
mod player;
pub mod world;

pub use blocks::{BlockEvent, BlockHit, BlockStore};
pub use camera::Camera;
pub use config::{InteractionConfig, LoadConfigError, PlayerConfig, SimConfig, SpawnConfig};
pub use physics::{MotionReport, movement_vector};
pub use picking::{ClickOutcome, PickTarget};
pub use player::{MotionState, Player};
pub use world::{FrameReport, World};
