//! Developer Tooling: world inspector and frame timing.
//!
//! # Invariants
//! - Tools only read the world.

mod inspector;
mod timer;

pub use inspector::{WorldInspector, WorldSummary};
pub use timer::{FrameStats, FrameTimer};
