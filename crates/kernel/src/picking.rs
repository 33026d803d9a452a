use blockcraft_common::{BlockPos, Material, Ray};
use blockcraft_terrain::{Terrain, raycast_surface};
use glam::Vec3;

use crate::blocks::{BlockHit, BlockStore};

/// What the crosshair ray landed on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickTarget {
    Block(BlockHit),
    Terrain(Vec3),
}

/// Result of resolving one click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Placed { pos: BlockPos, material: Material },
    Removed { pos: BlockPos, material: Material },
    /// The target cell is occupied or overlaps the player.
    Blocked(BlockPos),
    /// Remove aimed at terrain, which is not destructible.
    Ignored,
    /// Nothing within reach.
    Missed,
}

/// Placed blocks take precedence over the terrain surface.
pub(crate) fn pick<T: Terrain + ?Sized>(
    ray: &Ray,
    reach: f32,
    blocks: &BlockStore,
    terrain: &T,
) -> Option<PickTarget> {
    if let Some(hit) = blocks.raycast(ray, reach) {
        return Some(PickTarget::Block(hit));
    }
    raycast_surface(terrain, ray, reach).map(PickTarget::Terrain)
}

/// Cell a block lands in when placed on the terrain at `point`: the snapped
/// column, one unit above the floored surface height there.
pub(crate) fn terrain_placement<T: Terrain + ?Sized>(terrain: &T, point: Vec3) -> BlockPos {
    let x = point.x.floor() as i32;
    let z = point.z.floor() as i32;
    let y = terrain.height_at(x as f32, z as f32).floor() as i32 + 1;
    BlockPos::new(x, y, z)
}
