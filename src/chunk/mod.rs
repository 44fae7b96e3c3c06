//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-size cubic region of
//! the voxel grid and the unit of generation, meshing, and streaming.
//!
//! ## Storage
//!
//! A chunk owns a dense 1D array of `size³` voxels, flattened with
//! `index = x + y * size + z * size²` (`x` fastest, `z` slowest). The
//! ordering is load-bearing: generators fill the array in exactly this
//! order and the mesher indexes into it with the same arithmetic.
//!
//! ## Lifecycle
//!
//! A chunk is created empty when first requested by the streamer, has its
//! voxel array populated once by a generator, and is meshed zero or more
//! times (re-meshed whenever marked dirty). When it leaves the streamed
//! region it either moves into the LRU cache for possible reuse or is
//! discarded. See [`ChunkState`] for the state machine.

use crate::coords::{self, ChunkCoord};
use crate::voxel::VoxelType;

mod state;

pub use state::ChunkState;

/// An opaque handle to a chunk's rendered representation.
///
/// The handle is issued and owned by the external mesh consumer; the
/// terrain core only stores it so it can be released when the chunk's mesh
/// is replaced or the chunk is destroyed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(
    /// The consumer-assigned raw handle value.
    pub u64,
);

/// A fixed-size cubic region of voxels.
pub struct Chunk {
    coord: ChunkCoord,
    size: usize,
    voxels: Vec<VoxelType>,
    state: ChunkState,
    mesh_handle: Option<MeshHandle>,
}

impl Chunk {
    /// Creates a new, ungenerated chunk filled with air.
    ///
    /// # Arguments
    /// * `coord` - The chunk coordinates of the new chunk
    /// * `size` - Voxels per edge
    pub fn new(coord: ChunkCoord, size: usize) -> Self {
        debug_assert!(size > 0, "chunk size must be positive");
        Chunk {
            coord,
            size,
            voxels: vec![VoxelType::Air; size * size * size],
            state: ChunkState::PendingGeneration,
            mesh_handle: None,
        }
    }

    /// The chunk's position in chunk space.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Voxels per edge.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The chunk's lifecycle state.
    pub fn state(&self) -> ChunkState {
        self.state
    }

    /// Advances the lifecycle state.
    ///
    /// # Panics
    /// In debug builds, panics on an illegal transition; the lifecycle
    /// manager is the only intended caller and an illegal transition is a
    /// bug there.
    pub fn set_state(&mut self, next: ChunkState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal chunk state transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }

    /// Read access to the dense voxel array.
    pub fn voxels(&self) -> &[VoxelType] {
        &self.voxels
    }

    /// Replaces the voxel array with generated data and marks the chunk
    /// generated.
    ///
    /// # Panics
    /// In debug builds, panics if `voxels` is not exactly `size³` entries;
    /// the lifecycle manager validates generator output before calling.
    pub fn set_voxels(&mut self, voxels: Vec<VoxelType>) {
        debug_assert_eq!(
            voxels.len(),
            self.size * self.size * self.size,
            "voxel array length must be size³"
        );
        self.voxels = voxels;
        self.set_state(ChunkState::PendingMeshing);
    }

    /// The voxel at a chunk-local coordinate.
    ///
    /// # Panics
    /// In debug builds, panics if the coordinate is out of bounds.
    pub fn voxel_at(&self, x: usize, y: usize, z: usize) -> VoxelType {
        self.voxels[coords::flatten(x, y, z, self.size)]
    }

    /// The voxel at a signed chunk-local coordinate, returning
    /// [`VoxelType::Air`] for any coordinate outside the chunk.
    ///
    /// The mesher uses this for neighbor lookups, which is why voxels on
    /// the chunk boundary always expose a face on that side: the
    /// out-of-bounds neighbor reads as air.
    pub fn voxel_at_checked(&self, x: i32, y: i32, z: i32) -> VoxelType {
        if coords::in_bounds(x, y, z, self.size) {
            self.voxels[coords::flatten(x as usize, y as usize, z as usize, self.size)]
        } else {
            VoxelType::Air
        }
    }

    /// Writes a single voxel.
    ///
    /// Writing to a meshed chunk marks it dirty; the caller is responsible
    /// for re-enqueueing it for meshing.
    ///
    /// # Panics
    /// In debug builds, panics if the coordinate is out of bounds.
    pub fn set_voxel(&mut self, x: usize, y: usize, z: usize, voxel: VoxelType) {
        self.voxels[coords::flatten(x, y, z, self.size)] = voxel;
        if self.state == ChunkState::Meshed {
            self.set_state(ChunkState::Dirty);
        }
    }

    /// Whether the chunk contains no solid voxels at all.
    pub fn is_empty(&self) -> bool {
        self.voxels.iter().all(|v| !v.is_solid())
    }

    /// The handle of the chunk's current mesh, if it has one.
    pub fn mesh_handle(&self) -> Option<MeshHandle> {
        self.mesh_handle
    }

    /// Stores the handle returned by the mesh consumer.
    pub fn set_mesh_handle(&mut self, handle: MeshHandle) {
        self.mesh_handle = Some(handle);
    }

    /// Removes and returns the mesh handle, if any. Called when the mesh
    /// is about to be replaced or released.
    pub fn take_mesh_handle(&mut self) -> Option<MeshHandle> {
        self.mesh_handle.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    fn chunk() -> Chunk {
        Chunk::new(Point3::new(0, 0, 0), 4)
    }

    #[test]
    fn new_chunk_is_empty_air() {
        let chunk = chunk();
        assert_eq!(chunk.voxels().len(), 64);
        assert!(chunk.is_empty());
        assert_eq!(chunk.state(), ChunkState::PendingGeneration);
        assert_eq!(chunk.mesh_handle(), None);
    }

    #[test]
    fn set_voxels_advances_to_pending_meshing() {
        let mut chunk = chunk();
        chunk.set_voxels(vec![VoxelType::Stone; 64]);
        assert_eq!(chunk.state(), ChunkState::PendingMeshing);
        assert_eq!(chunk.voxel_at(3, 3, 3), VoxelType::Stone);
    }

    #[test]
    fn out_of_bounds_neighbor_reads_as_air() {
        let mut chunk = chunk();
        chunk.set_voxels(vec![VoxelType::Stone; 64]);
        assert_eq!(chunk.voxel_at_checked(-1, 0, 0), VoxelType::Air);
        assert_eq!(chunk.voxel_at_checked(0, 4, 0), VoxelType::Air);
        assert_eq!(chunk.voxel_at_checked(0, 0, 3), VoxelType::Stone);
    }

    #[test]
    fn voxel_write_follows_flatten_order() {
        let mut chunk = chunk();
        chunk.set_voxels(vec![VoxelType::Air; 64]);
        chunk.set_voxel(1, 2, 3, VoxelType::Dirt);
        assert_eq!(chunk.voxels()[1 + 2 * 4 + 3 * 16], VoxelType::Dirt);
    }

    #[test]
    fn editing_a_meshed_chunk_marks_it_dirty() {
        let mut chunk = chunk();
        chunk.set_voxels(vec![VoxelType::Air; 64]);
        chunk.set_state(ChunkState::Meshed);

        chunk.set_voxel(0, 0, 0, VoxelType::Grass);
        assert_eq!(chunk.state(), ChunkState::Dirty);
    }

    #[test]
    fn editing_an_unmeshed_chunk_keeps_its_state() {
        let mut chunk = chunk();
        chunk.set_voxels(vec![VoxelType::Air; 64]);
        chunk.set_voxel(0, 0, 0, VoxelType::Grass);
        assert_eq!(chunk.state(), ChunkState::PendingMeshing);
    }

    #[test]
    fn mesh_handle_take_clears_it() {
        let mut chunk = chunk();
        chunk.set_mesh_handle(MeshHandle(7));
        assert_eq!(chunk.take_mesh_handle(), Some(MeshHandle(7)));
        assert_eq!(chunk.mesh_handle(), None);
    }
}
