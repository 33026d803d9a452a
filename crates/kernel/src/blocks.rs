use std::collections::BTreeMap;

use blockcraft_common::{Aabb, BlockPos, Material, Ray};
use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

/// An event record produced by every mutation of the block collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockEvent {
    Placed { pos: BlockPos, material: Material },
    /// Carries the removed material so the log can be reversed.
    Removed { pos: BlockPos, material: Material },
}

/// Result of a ray hitting a placed block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockHit {
    pub pos: BlockPos,
    /// Outward normal of the face the ray entered through.
    pub normal: IVec3,
    pub distance: f32,
    pub point: Vec3,
}

impl BlockHit {
    /// The empty cell in front of the hit face.
    pub fn adjacent(&self) -> BlockPos {
        self.pos.offset(self.normal)
    }
}

/// Player-placed blocks, one per grid cell.
///
/// Uses BTreeMap so iteration and hashing are independent of insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockStore {
    blocks: BTreeMap<BlockPos, Material>,
    #[serde(skip)]
    events: Vec<BlockEvent>,
}

impl PartialEq for BlockStore {
    fn eq(&self, other: &Self) -> bool {
        self.blocks == other.blocks
    }
}

impl BlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, pos: BlockPos) -> Option<Material> {
        self.blocks.get(&pos).copied()
    }

    pub fn contains(&self, pos: BlockPos) -> bool {
        self.blocks.contains_key(&pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockPos, Material)> + '_ {
        self.blocks.iter().map(|(p, m)| (*p, *m))
    }

    /// Insert a block. Returns false and logs nothing if the cell is taken.
    pub fn place(&mut self, pos: BlockPos, material: Material) -> bool {
        if self.blocks.contains_key(&pos) {
            return false;
        }
        self.blocks.insert(pos, material);
        self.events.push(BlockEvent::Placed { pos, material });
        true
    }

    /// Remove a block. Returns its material if it existed.
    pub fn remove(&mut self, pos: BlockPos) -> Option<Material> {
        let material = self.blocks.remove(&pos)?;
        self.events.push(BlockEvent::Removed { pos, material });
        Some(material)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[BlockEvent] {
        &self.events
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<BlockEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reconstruct a store from a sequence of events.
    pub fn replay(events: &[BlockEvent]) -> Self {
        let mut store = Self::new();
        for event in events {
            match *event {
                BlockEvent::Placed { pos, material } => {
                    store.blocks.insert(pos, material);
                }
                BlockEvent::Removed { pos, .. } => {
                    store.blocks.remove(&pos);
                }
            }
        }
        store
    }

    /// Cells whose unit cube strictly overlaps `aabb`.
    fn cells_overlapping(aabb: &Aabb) -> impl Iterator<Item = BlockPos> {
        let lo = aabb.min.floor().as_ivec3();
        let hi = (aabb.max.ceil() - Vec3::ONE).as_ivec3();
        (lo.x..=hi.x).flat_map(move |x| {
            (lo.y..=hi.y).flat_map(move |y| (lo.z..=hi.z).map(move |z| BlockPos::new(x, y, z)))
        })
    }

    /// Colliders of placed blocks that overlap `aabb`.
    ///
    /// Only the cells the box covers are looked up, so the cost depends on
    /// the box size rather than on how many blocks exist.
    pub fn colliders_overlapping<'a>(&'a self, aabb: &'a Aabb) -> impl Iterator<Item = Aabb> + 'a {
        Self::cells_overlapping(aabb)
            .filter(move |pos| self.blocks.contains_key(pos))
            .map(BlockPos::aabb)
            .filter(move |b| b.intersects(aabb))
    }

    pub fn intersects(&self, aabb: &Aabb) -> bool {
        self.colliders_overlapping(aabb).next().is_some()
    }

    /// Walk the grid cells along `ray` (3D DDA) and return the first placed
    /// block within `max_distance`. The cell containing the origin is skipped.
    pub fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<BlockHit> {
        if self.blocks.is_empty() {
            return None;
        }

        let origin = ray.origin;
        let dir = ray.direction;
        let mut cell = origin.floor().as_ivec3();
        let mut step = IVec3::ZERO;
        let mut t_max = Vec3::splat(f32::INFINITY);
        let mut t_delta = Vec3::splat(f32::INFINITY);

        for axis in 0..3 {
            let d = dir[axis];
            if d > 0.0 {
                step[axis] = 1;
                t_delta[axis] = 1.0 / d;
                t_max[axis] = (cell[axis] as f32 + 1.0 - origin[axis]) / d;
            } else if d < 0.0 {
                step[axis] = -1;
                t_delta[axis] = -1.0 / d;
                t_max[axis] = (origin[axis] - cell[axis] as f32) / -d;
            }
        }

        loop {
            let axis = if t_max.x < t_max.y {
                if t_max.x < t_max.z { 0 } else { 2 }
            } else if t_max.y < t_max.z {
                1
            } else {
                2
            };

            let t = t_max[axis];
            if !t.is_finite() || t > max_distance {
                return None;
            }
            cell[axis] += step[axis];
            t_max[axis] += t_delta[axis];

            let pos = BlockPos::from(cell);
            if self.blocks.contains_key(&pos) {
                let mut normal = IVec3::ZERO;
                normal[axis] = -step[axis];
                return Some(BlockHit {
                    pos,
                    normal,
                    distance: t,
                    point: ray.at(t),
                });
            }
        }
    }

    /// Deterministic FNV-1a digest of the collection in canonical order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for (pos, material) in &self.blocks {
            mix(&mut h, &pos.x.to_le_bytes());
            mix(&mut h, &pos.y.to_le_bytes());
            mix(&mut h, &pos.z.to_le_bytes());
            mix(&mut h, &[*material as u8]);
        }
        h
    }
}
