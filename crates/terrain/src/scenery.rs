use std::collections::BTreeMap;

use blockcraft_common::{BlockPos, Material};
use serde::{Deserialize, Serialize};

use crate::heightmap::{Heightmap, Terrain};
use crate::noise::hash2;

/// Placement rules for decorative trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneryConfig {
    /// Number of candidate sites.
    pub candidates: u32,
    /// Side of the square, centered on the origin, that candidates fall in.
    pub extent: f32,
    /// Noise threshold a site must exceed to grow a tree.
    pub density_gate: f64,
    /// Offset of the density noise relative to the terrain noise.
    pub density_offset: [f64; 2],
    /// Trees need at least this much ground above the water plane.
    pub shore_clearance: f32,
}

impl Default for SceneryConfig {
    fn default() -> Self {
        Self {
            candidates: 70,
            extent: 700.0 * 0.85,
            density_gate: 0.55,
            density_offset: [200.0, -500.0],
            shore_clearance: 1.0,
        }
    }
}

/// Static voxel decoration. Visual only: scenery takes no part in
/// collision or picking and cannot be removed.
#[derive(Debug, Clone, Default)]
pub struct Scenery {
    pub blocks: BTreeMap<BlockPos, Material>,
    pub tree_count: usize,
}

impl Scenery {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

const LEAF_RADIUS: i32 = 2;
const LEAF_MANHATTAN_LIMIT: i32 = 4;

/// Deterministically scatter trees over the heightmap.
pub fn scatter_trees(heightmap: &Heightmap, config: &SceneryConfig) -> Scenery {
    let _span = tracing::debug_span!("scatter_trees", candidates = config.candidates).entered();
    let mut scenery = Scenery::default();

    for t in 0..config.candidates {
        let t = f64::from(t);
        let x = (hash2(t * 10.0, t * 33.0) - 0.5) * f64::from(config.extent);
        let z = (hash2(t * 90.0, t * 17.0) - 0.5) * f64::from(config.extent);

        let gate = heightmap.fbm(x + config.density_offset[0], z + config.density_offset[1]);
        if gate <= config.density_gate {
            continue;
        }
        if grow_tree(heightmap, config, x, z, &mut scenery.blocks) {
            scenery.tree_count += 1;
        }
    }

    tracing::debug!(
        trees = scenery.tree_count,
        blocks = scenery.blocks.len(),
        "scenery scattered"
    );
    scenery
}

fn grow_tree(
    heightmap: &Heightmap,
    config: &SceneryConfig,
    x: f64,
    z: f64,
    blocks: &mut BTreeMap<BlockPos, Material>,
) -> bool {
    let base = heightmap.height_at(x as f32, z as f32);
    if base < heightmap.water_level() + config.shore_clearance {
        return false;
    }

    let trunk_height = 4 + (hash2(x, z) * 3.0).floor() as i32;
    let (cx, cz) = (x.floor() as i32, z.floor() as i32);
    let ground = base.floor() as i32;

    for i in 0..trunk_height {
        blocks.insert(BlockPos::new(cx, ground + 1 + i, cz), Material::Wood);
    }

    let top = ground + 1 + trunk_height;
    for lx in -LEAF_RADIUS..=LEAF_RADIUS {
        for lz in -LEAF_RADIUS..=LEAF_RADIUS {
            for ly in -1i32..=2 {
                if lx.abs() + lz.abs() + ly.abs() > LEAF_MANHATTAN_LIMIT {
                    continue;
                }
                // Trunk wins where the leaf blob overlaps it.
                blocks
                    .entry(BlockPos::new(cx + lx, top + ly, cz + lz))
                    .or_insert(Material::Leaf);
            }
        }
    }
    true
}
