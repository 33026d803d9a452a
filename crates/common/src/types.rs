use std::fmt;
use std::str::FromStr;

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::ParseMaterialError;
use crate::geometry::Aabb;

/// Integer grid cell of a unit block.
///
/// Ordered lexicographically by `(x, y, z)` so block collections keyed by
/// position iterate deterministically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The cell containing a world-space point.
    pub fn containing(point: Vec3) -> Self {
        Self {
            x: point.x.floor() as i32,
            y: point.y.floor() as i32,
            z: point.z.floor() as i32,
        }
    }

    /// The neighbouring cell in the direction of `delta` (usually a face normal).
    pub fn offset(self, delta: IVec3) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            z: self.z + delta.z,
        }
    }

    /// Minimum corner in world space.
    pub fn min_corner(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    /// Center of the unit cube in world space.
    pub fn center(self) -> Vec3 {
        self.min_corner() + Vec3::splat(0.5)
    }

    /// Collider occupied by a block in this cell.
    pub fn aabb(self) -> Aabb {
        let min = self.min_corner();
        Aabb::new(min, min + Vec3::ONE)
    }

    pub fn as_ivec3(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }
}

impl From<IVec3> for BlockPos {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Block material kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    #[default]
    Grass,
    Stone,
    Dirt,
    Water,
    Wood,
    Leaf,
}

impl Material {
    pub const ALL: [Material; 6] = [
        Material::Grass,
        Material::Stone,
        Material::Dirt,
        Material::Water,
        Material::Wood,
        Material::Leaf,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Material::Grass => "grass",
            Material::Stone => "stone",
            Material::Dirt => "dirt",
            Material::Water => "water",
            Material::Wood => "wood",
            Material::Leaf => "leaf",
        }
    }

    /// Base color as `0xRRGGBB`.
    pub fn color(self) -> u32 {
        match self {
            Material::Grass => 0x55aa55,
            Material::Stone => 0x888888,
            Material::Dirt => 0x8b5a2b,
            Material::Water => 0x2f7fe0,
            Material::Wood => 0x6b4f2a,
            Material::Leaf => 0x2f8a3a,
        }
    }

    pub fn is_translucent(self) -> bool {
        matches!(self, Material::Water)
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Material {
    type Err = ParseMaterialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Material::ALL
            .into_iter()
            .find(|m| m.name() == lowered)
            .ok_or_else(|| ParseMaterialError(s.to_string()))
    }
}
