//! # Voxel Type Module
//!
//! This module defines the different types of voxels in the terrain.
//! It provides functionality for type identification, conversion from the
//! compact integer representation, and per-type appearance lookup.

use num_derive::FromPrimitive;
use phf::phf_map;

use super::VoxelTypeId;

/// Enumerates all possible voxel types in the terrain.
///
/// `Air` is the universal empty sentinel: it is the only non-solid variant
/// and compares unequal to every solid type. The `FromPrimitive` derive
/// allows conversion from the compact integer representation used in
/// storage.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum VoxelType {
    /// Empty space. Non-solid and never meshed.
    Air,

    /// A grass voxel, the usual terrain surface.
    Grass,

    /// A dirt voxel, found directly below the surface.
    Dirt,

    /// A stone voxel, the bulk of the underground.
    Stone,

    /// A sand voxel, found near the water level.
    Sand,

    /// A water voxel.
    Water,

    /// A wood voxel.
    Wood,

    /// A leaves voxel.
    Leaves,
}

/// Per-type RGBA vertex colors, keyed by voxel id.
///
/// Air has no entry; appearance lookups only happen for solid voxels, and
/// the fallback color is an unmistakable magenta.
static VOXEL_COLORS: phf::Map<VoxelTypeId, [f32; 4]> = phf_map! {
    1u8 => [0.33, 0.55, 0.27, 1.0], // Grass
    2u8 => [0.45, 0.32, 0.22, 1.0], // Dirt
    3u8 => [0.52, 0.52, 0.54, 1.0], // Stone
    4u8 => [0.86, 0.79, 0.59, 1.0], // Sand
    5u8 => [0.22, 0.45, 0.76, 0.8], // Water
    6u8 => [0.39, 0.26, 0.15, 1.0], // Wood
    7u8 => [0.24, 0.47, 0.21, 0.9], // Leaves
};

impl VoxelType {
    /// Converts a compact voxel id back to a `VoxelType`.
    ///
    /// # Returns
    /// The corresponding type, or `None` if the id is not a valid variant.
    pub fn from_id(id: VoxelTypeId) -> Option<Self> {
        num::FromPrimitive::from_u8(id)
    }

    /// The compact integer representation of this type.
    pub fn id(self) -> VoxelTypeId {
        self as VoxelTypeId
    }

    /// Whether this voxel occupies space. False exactly for [`Air`](VoxelType::Air).
    pub fn is_solid(self) -> bool {
        self != VoxelType::Air
    }

    /// The RGBA color carried by every face of this voxel type.
    pub fn color(self) -> [f32; 4] {
        VOXEL_COLORS
            .get(&self.id())
            .copied()
            .unwrap_or([1.0, 0.0, 1.0, 1.0])
    }

    /// Every solid voxel type, in id order.
    pub fn all_solid() -> [VoxelType; 7] {
        [
            VoxelType::Grass,
            VoxelType::Dirt,
            VoxelType::Stone,
            VoxelType::Sand,
            VoxelType::Water,
            VoxelType::Wood,
            VoxelType::Leaves,
        ]
    }
}
