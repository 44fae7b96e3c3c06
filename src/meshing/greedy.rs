//! Greedy meshing implementation.
//!
//! For each of the three principal axes and both directions along each
//! axis, the mesher walks the chunk slice by slice, builds a 2D mask of
//! externally visible faces over the slice's two free axes, and merges
//! runs of same-type mask cells into maximal rectangles. One quad is
//! emitted per rectangle.
//!
//! A mask cell is active when its voxel is solid and the neighbor one step
//! along the sweep direction is air or outside the chunk. Out-of-bounds
//! neighbors read as air, so voxels on the chunk boundary always expose a
//! face there: the mesher never merges across chunk boundaries, even when
//! the neighbor chunk is loaded.
//!
//! Cost is amortized O(size³) per chunk: six sweeps of `size` slices, each
//! an O(size²) mask build, with rectangle growth bounded by the slice
//! area. The union of emitted quads covers exactly the set of externally
//! visible solid faces: none twice, none missing.

use bitvec::prelude::*;
use log::trace;
use web_time::Instant;

use crate::chunk::Chunk;
use crate::voxel::{Face, VoxelType};

use super::{MeshBuffers, Quad};

/// Meshes one chunk into the caller's scratch buffers.
///
/// The buffers are cleared first and refilled; reusing one `MeshBuffers`
/// across calls avoids reallocating per chunk.
pub fn mesh_chunk(chunk: &Chunk, buffers: &mut MeshBuffers) {
    let start = Instant::now();
    buffers.clear();

    let size = chunk.size();
    let area = size * size;
    let mut mask_active: BitVec = bitvec![0; area];
    let mut mask_types: Vec<VoxelType> = vec![VoxelType::Air; area];

    for face in Face::all() {
        sweep_face(chunk, face, &mut mask_active, &mut mask_types, buffers);
    }

    trace!(
        "meshed chunk {:?}: {} quads, {} vertices in {:?}",
        chunk.coord(),
        buffers.quad_count(),
        buffers.vertex_count(),
        start.elapsed()
    );
}

/// Runs the slice-by-slice mask sweep for one face direction.
fn sweep_face(
    chunk: &Chunk,
    face: Face,
    mask_active: &mut BitVec,
    mask_types: &mut [VoxelType],
    buffers: &mut MeshBuffers,
) {
    let size = chunk.size();
    let axis = face.axis();
    let u_axis = (axis + 1) % 3;
    let v_axis = (axis + 2) % 3;

    for slice in 0..size {
        // Build the visibility mask for this slice.
        mask_active.fill(false);
        let mut any_visible = false;
        for v in 0..size {
            for u in 0..size {
                let mut pos = [0usize; 3];
                pos[axis] = slice;
                pos[u_axis] = u;
                pos[v_axis] = v;

                let voxel = chunk.voxel_at(pos[0], pos[1], pos[2]);
                if !voxel.is_solid() {
                    continue;
                }

                let mut neighbor = [pos[0] as i32, pos[1] as i32, pos[2] as i32];
                neighbor[axis] += face.step();
                if !chunk
                    .voxel_at_checked(neighbor[0], neighbor[1], neighbor[2])
                    .is_solid()
                {
                    let cell = v * size + u;
                    mask_active.set(cell, true);
                    mask_types[cell] = voxel;
                    any_visible = true;
                }
            }
        }
        if !any_visible {
            continue;
        }

        // Consume the mask with maximal same-type rectangles.
        for v in 0..size {
            let mut u = 0;
            while u < size {
                let cell = v * size + u;
                if !mask_active[cell] {
                    u += 1;
                    continue;
                }
                let quad_type = mask_types[cell];

                // Extend the width while consecutive cells stay active
                // with the same type.
                let mut width = 1;
                while u + width < size {
                    let next = v * size + u + width;
                    if mask_active[next] && mask_types[next] == quad_type {
                        width += 1;
                    } else {
                        break;
                    }
                }

                // Extend the height while every cell of the next row
                // matches across the full width.
                let mut height = 1;
                'grow: while v + height < size {
                    for du in 0..width {
                        let next = (v + height) * size + u + du;
                        if !mask_active[next] || mask_types[next] != quad_type {
                            break 'grow;
                        }
                    }
                    height += 1;
                }

                buffers.push_quad(&Quad::new(face, slice, u, v, width, height, quad_type));

                // Clear the consumed cells so they are not revisited.
                for dv in 0..height {
                    for du in 0..width {
                        mask_active.set((v + dv) * size + u + du, false);
                    }
                }
                u += width;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    fn chunk_from(size: usize, fill: impl Fn(usize, usize, usize) -> VoxelType) -> Chunk {
        let mut voxels = Vec::with_capacity(size * size * size);
        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    voxels.push(fill(x, y, z));
                }
            }
        }
        let mut chunk = Chunk::new(Point3::new(0, 0, 0), size);
        chunk.set_voxels(voxels);
        chunk
    }

    /// Brute-force count of externally visible faces, for cross-checking
    /// the mesher's quad coverage.
    fn visible_face_count(chunk: &Chunk) -> usize {
        let size = chunk.size() as i32;
        let mut count = 0;
        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    if !chunk.voxel_at_checked(x, y, z).is_solid() {
                        continue;
                    }
                    for face in Face::all() {
                        let mut neighbor = [x, y, z];
                        neighbor[face.axis()] += face.step();
                        if !chunk
                            .voxel_at_checked(neighbor[0], neighbor[1], neighbor[2])
                            .is_solid()
                        {
                            count += 1;
                        }
                    }
                }
            }
        }
        count
    }

    /// Total unit-face area covered by the emitted quads.
    fn covered_face_area(buffers: &MeshBuffers) -> usize {
        (0..buffers.quad_count())
            .map(|q| {
                let uv = buffers.uvs[q * 4 + 2];
                (uv[0] * uv[1]) as usize
            })
            .sum()
    }

    #[test]
    fn empty_chunk_produces_nothing() {
        let chunk = chunk_from(8, |_, _, _| VoxelType::Air);
        let mut buffers = MeshBuffers::new();
        mesh_chunk(&chunk, &mut buffers);
        assert!(buffers.is_empty());
    }

    #[test]
    fn single_voxel_produces_six_unmerged_quads() {
        let chunk = chunk_from(8, |x, y, z| {
            if (x, y, z) == (3, 3, 3) {
                VoxelType::Stone
            } else {
                VoxelType::Air
            }
        });
        let mut buffers = MeshBuffers::new();
        mesh_chunk(&chunk, &mut buffers);

        assert_eq!(buffers.quad_count(), 6);
        assert_eq!(buffers.vertex_count(), 24);
        assert_eq!(buffers.indices.len(), 36);
        // Every quad is 1x1.
        for q in 0..6 {
            assert_eq!(buffers.uvs[q * 4 + 2], [1.0, 1.0]);
        }
    }

    #[test]
    fn flat_slab_merges_top_and_bottom_fully() {
        for size in [4, 8, 16] {
            let chunk = chunk_from(size, |_, y, _| {
                if y == 0 {
                    VoxelType::Grass
                } else {
                    VoxelType::Air
                }
            });
            let mut buffers = MeshBuffers::new();
            mesh_chunk(&chunk, &mut buffers);

            // One full-slice quad up, one down, plus four 1-voxel-tall
            // side strips along the chunk border.
            assert_eq!(buffers.quad_count(), 6, "size {size}");

            let full = (size * size) as f32;
            let merged_horizontals = (0..buffers.quad_count())
                .filter(|&q| {
                    let uv = buffers.uvs[q * 4 + 2];
                    uv[0] * uv[1] == full
                })
                .count();
            assert_eq!(merged_horizontals, 2, "size {size}");
        }
    }

    #[test]
    fn uniform_solid_chunk_is_one_quad_per_face() {
        let chunk = chunk_from(8, |_, _, _| VoxelType::Stone);
        let mut buffers = MeshBuffers::new();
        mesh_chunk(&chunk, &mut buffers);
        assert_eq!(buffers.quad_count(), 6);
        for q in 0..6 {
            assert_eq!(buffers.uvs[q * 4 + 2], [8.0, 8.0]);
        }
    }

    #[test]
    fn different_types_never_merge() {
        // Two voxels side by side along X, same plane, different types:
        // their coplanar faces stay separate quads.
        let chunk = chunk_from(4, |x, y, z| match (x, y, z) {
            (1, 0, 0) => VoxelType::Grass,
            (2, 0, 0) => VoxelType::Sand,
            _ => VoxelType::Air,
        });
        let mut buffers = MeshBuffers::new();
        mesh_chunk(&chunk, &mut buffers);

        // 5 exposed faces each (the shared face pair is hidden).
        assert_eq!(buffers.quad_count(), 10);
        for q in 0..buffers.quad_count() {
            assert_eq!(buffers.uvs[q * 4 + 2], [1.0, 1.0]);
        }
    }

    #[test]
    fn same_type_neighbors_do_merge() {
        let chunk = chunk_from(4, |x, y, z| match (x, y, z) {
            (1, 0, 0) | (2, 0, 0) => VoxelType::Grass,
            _ => VoxelType::Air,
        });
        let mut buffers = MeshBuffers::new();
        mesh_chunk(&chunk, &mut buffers);

        // A 2x1x1 bar: 2 end caps plus 4 merged 2x1 side faces.
        assert_eq!(buffers.quad_count(), 6);
    }

    #[test]
    fn solid_type_checkerboard_emits_only_unmerged_border_faces() {
        // Alternating solid types with no air: interior faces are hidden,
        // border faces alternate type so nothing merges.
        let size = 4;
        let chunk = chunk_from(size, |x, y, z| {
            if (x + y + z) % 2 == 0 {
                VoxelType::Stone
            } else {
                VoxelType::Dirt
            }
        });
        let mut buffers = MeshBuffers::new();
        mesh_chunk(&chunk, &mut buffers);

        assert_eq!(buffers.quad_count(), 6 * size * size);
        for q in 0..buffers.quad_count() {
            assert_eq!(buffers.uvs[q * 4 + 2], [1.0, 1.0]);
        }
    }

    #[test]
    fn air_checkerboard_exposes_every_face_of_every_voxel() {
        let size = 4;
        let chunk = chunk_from(size, |x, y, z| {
            if (x + y + z) % 2 == 0 {
                VoxelType::Stone
            } else {
                VoxelType::Air
            }
        });
        let solid_count = chunk.voxels().iter().filter(|v| v.is_solid()).count();

        let mut buffers = MeshBuffers::new();
        mesh_chunk(&chunk, &mut buffers);
        assert_eq!(buffers.quad_count(), 6 * solid_count);
    }

    #[test]
    fn quad_area_matches_visible_faces_on_random_terrain() {
        // Coverage property: the quads tile the visible faces exactly, so
        // their total area equals the brute-force visible face count.
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        for _ in 0..8 {
            let mut voxels = vec![VoxelType::Air; 8 * 8 * 8];
            for voxel in voxels.iter_mut() {
                *voxel = match rng.u8(0..4) {
                    0 => VoxelType::Stone,
                    1 => VoxelType::Dirt,
                    _ => VoxelType::Air,
                };
            }
            let mut chunk = Chunk::new(Point3::new(0, 0, 0), 8);
            chunk.set_voxels(voxels);

            let mut buffers = MeshBuffers::new();
            mesh_chunk(&chunk, &mut buffers);
            assert_eq!(covered_face_area(&buffers), visible_face_count(&chunk));
        }
    }

    #[test]
    fn boundary_voxels_expose_chunk_border_faces() {
        // A voxel in the chunk corner emits faces on all three border
        // sides even though a neighbor chunk might exist there.
        let chunk = chunk_from(4, |x, y, z| {
            if (x, y, z) == (0, 0, 0) {
                VoxelType::Stone
            } else {
                VoxelType::Air
            }
        });
        let mut buffers = MeshBuffers::new();
        mesh_chunk(&chunk, &mut buffers);
        assert_eq!(buffers.quad_count(), 6);
    }

    #[test]
    fn scratch_buffers_are_cleared_between_chunks() {
        let solid = chunk_from(4, |_, _, _| VoxelType::Stone);
        let empty = chunk_from(4, |_, _, _| VoxelType::Air);

        let mut buffers = MeshBuffers::new();
        mesh_chunk(&solid, &mut buffers);
        assert!(!buffers.is_empty());
        mesh_chunk(&empty, &mut buffers);
        assert!(buffers.is_empty());
    }
}
