use glam::Vec3;

use crate::heightmap::Terrain;

/// One-time sample grid of the terrain surface, centered on the origin.
///
/// This is the visual projection of the heightmap. Collision never reads it;
/// it queries the heightmap directly, so mesh resolution cannot desync
/// physics from visuals beyond the interpolation between vertices.
#[derive(Debug, Clone)]
pub struct TerrainMesh {
    pub size: f32,
    pub segments: u32,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl TerrainMesh {
    /// Default extent of the terrain plane in world units.
    pub const DEFAULT_SIZE: f32 = 700.0;
    /// Default number of quads along each side.
    pub const DEFAULT_SEGMENTS: u32 = 260;

    /// Sample `(segments + 1)^2` vertices over a `size x size` square.
    pub fn build<T: Terrain + ?Sized>(terrain: &T, size: f32, segments: u32) -> Self {
        let _span = tracing::debug_span!("terrain_mesh_build", size, segments).entered();
        let segments = segments.max(1);
        let row = segments as usize + 1;
        let step = size / segments as f32;
        let half = size * 0.5;

        let mut positions = Vec::with_capacity(row * row);
        for iz in 0..row {
            let z = -half + iz as f32 * step;
            for ix in 0..row {
                let x = -half + ix as f32 * step;
                positions.push(Vec3::new(x, terrain.height_at(x, z), z));
            }
        }

        let mut indices = Vec::with_capacity(segments as usize * segments as usize * 6);
        for iz in 0..segments {
            for ix in 0..segments {
                let i0 = iz * (segments + 1) + ix;
                let i1 = i0 + 1;
                let i2 = i0 + segments + 1;
                let i3 = i2 + 1;
                // Counter-clockwise when viewed from +Y.
                indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
            }
        }

        let normals = accumulate_normals(&positions, &indices);
        tracing::debug!(vertices = positions.len(), "terrain mesh built");

        Self {
            size,
            segments,
            positions,
            normals,
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Lowest and highest sampled elevation.
    pub fn elevation_range(&self) -> (f32, f32) {
        self.positions
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            })
    }
}

fn accumulate_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    for n in &mut normals {
        *n = n.try_normalize().unwrap_or(Vec3::Y);
    }
    normals
}
