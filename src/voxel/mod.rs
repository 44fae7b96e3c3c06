//! # Voxel Model
//!
//! The closed set of voxel types, their compact integer representation,
//! and the six face directions of an axis-aligned voxel cube.

pub mod face;
pub mod voxel_type;

pub use face::Face;
pub use voxel_type::VoxelType;

/// The underlying integer type used to represent voxel types in memory.
/// This is used for compact storage of voxel data and for the static
/// appearance table.
pub type VoxelTypeId = u8;
