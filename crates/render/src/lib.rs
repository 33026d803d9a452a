//! Rendering Adapter: renderer-agnostic projection of the voxel world.
//!
//! # Invariants
//! - Renderers cannot mutate world truth directly.
//! - Render state derives from world state and view.
//!
//! A GPU backend plugs in behind the `Renderer` trait. `DebugTextRenderer`
//! is the in-tree implementation used by the CLI and by tests.

mod projection;
mod renderer;

pub use projection::{BlockInstance, SceneProjection};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};
