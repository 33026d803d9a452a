use std::fmt::Write;

use blockcraft_kernel::{Camera, World};
use blockcraft_terrain::Terrain;
use glam::Mat4;

use crate::projection::SceneProjection;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    pub camera: Camera,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl RenderView {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            fov_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 2000.0,
        }
    }

    /// View through the player's eyes.
    pub fn from_world<T: Terrain>(world: &World<T>) -> Self {
        Self::new(world.camera())
    }

    pub fn view_projection(&self) -> Mat4 {
        let proj = self.camera.projection_matrix(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
        proj * self.camera.view_matrix()
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads world state and a view configuration, then produces
/// output. It never mutates the world.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given world state and view.
    fn render<T: Terrain>(&self, world: &World<T>, view: &RenderView) -> Self::Output;
}

/// Text renderer for CLI output, logging and tests.
#[derive(Debug)]
pub struct DebugTextRenderer {
    /// Cap on listed instances; the rest are counted.
    pub max_listed: usize,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self { max_listed: 16 }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render<T: Terrain>(&self, world: &World<T>, view: &RenderView) -> String {
        let scene = SceneProjection::build(world, None, view);
        let player = world.player();
        let cam = &view.camera;

        let mut out = String::new();
        let _ = writeln!(out, "=== World State (tick={}) ===", world.tick());
        let _ = writeln!(
            out,
            "Player: feet=({:.2}, {:.2}, {:.2}) vy={:.3} {:?}",
            player.feet.x, player.feet.y, player.feet.z, player.velocity_y, player.state
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) yaw={:.2} pitch={:.2} fov={:.0}",
            cam.eye.x, cam.eye.y, cam.eye.z, cam.yaw, cam.pitch, view.fov_degrees
        );
        let _ = writeln!(out, "Blocks: {}", scene.instances.len());

        for inst in scene.instances.iter().take(self.max_listed) {
            let _ = writeln!(out, "  {} {} #{:06x}", inst.pos, inst.material, inst.color);
        }
        if scene.instances.len() > self.max_listed {
            let _ = writeln!(out, "  ... {} more", scene.instances.len() - self.max_listed);
        }
        out
    }
}
