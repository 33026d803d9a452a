use blockcraft_common::{BlockPos, Material};
use blockcraft_kernel::World;
use blockcraft_terrain::{Scenery, Terrain};
use glam::{Mat4, Vec3};

use crate::renderer::RenderView;

/// One unit cube to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockInstance {
    pub pos: BlockPos,
    pub center: Vec3,
    pub material: Material,
    /// `0xRRGGBB`.
    pub color: u32,
    pub translucent: bool,
    /// Player-placed as opposed to scenery.
    pub placed: bool,
}

impl BlockInstance {
    fn new(pos: BlockPos, material: Material, placed: bool) -> Self {
        Self {
            pos,
            center: pos.center(),
            material,
            color: material.color(),
            translucent: material.is_translucent(),
            placed,
        }
    }
}

/// Draw list for one frame: cube instances plus the camera matrix.
///
/// Opaque instances come first, translucent ones after, each group in grid
/// order, so output is stable for a given world.
#[derive(Debug, Clone)]
pub struct SceneProjection {
    pub instances: Vec<BlockInstance>,
    pub view_projection: Mat4,
    pub eye: Vec3,
}

impl SceneProjection {
    pub fn build<T: Terrain>(world: &World<T>, scenery: Option<&Scenery>, view: &RenderView) -> Self {
        let _span = tracing::trace_span!("scene_projection").entered();

        let mut instances: Vec<BlockInstance> = world
            .blocks()
            .iter()
            .map(|(pos, material)| BlockInstance::new(pos, material, true))
            .collect();
        if let Some(scenery) = scenery {
            // Placed blocks win where the two share a cell.
            instances.extend(
                scenery
                    .blocks
                    .iter()
                    .filter(|(pos, _)| !world.blocks().contains(**pos))
                    .map(|(pos, material)| BlockInstance::new(*pos, *material, false)),
            );
        }
        instances.sort_by_key(|i| (i.translucent, i.pos));

        tracing::trace!(instances = instances.len(), "scene projected");
        Self {
            instances,
            view_projection: view.view_projection(),
            eye: view.camera.eye,
        }
    }

    pub fn placed_count(&self) -> usize {
        self.instances.iter().filter(|i| i.placed).count()
    }

    /// Whether a world point lands inside the clip volume.
    pub fn is_visible(&self, point: Vec3) -> bool {
        let clip = self.view_projection * point.extend(1.0);
        if clip.w <= 0.0 {
            return false;
        }
        let ndc = clip.truncate() / clip.w;
        ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0 && (0.0..=1.0).contains(&ndc.z)
    }
}
