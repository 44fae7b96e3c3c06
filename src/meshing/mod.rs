//! # Meshing Module
//!
//! Converts a chunk's dense voxel array into triangle mesh data using
//! greedy face merging. The key goals are:
//! 1. Emit one quad per maximal same-type rectangle of visible faces
//! 2. Keep the output in plain caller-owned buffers with no hidden
//!    allocation in the hot path
//! 3. Stay GPU-agnostic: the external mesh consumer owns upload, bounds,
//!    and anything else renderer-shaped
//!
//! The mesher writes separate position/normal/UV/color streams plus a
//! triangle index stream into a reusable [`MeshBuffers`]; consumers that
//! want an interleaved vertex layout can pack one with
//! [`MeshBuffers::interleaved`].

use bytemuck::{Pod, Zeroable};

use crate::voxel::{Face, VoxelType};

pub mod greedy;

pub use greedy::mesh_chunk;

/// A single interleaved mesh vertex.
///
/// `#[repr(C)]` and the `Pod` derive give the layout guarantees an
/// external renderer needs to copy the packed stream straight into a GPU
/// buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in chunk-local voxel units.
    pub position: [f32; 3],
    /// Outward face normal.
    pub normal: [f32; 3],
    /// Texture coordinate; greedy quads tile, so values run up to the
    /// quad's extent rather than 1.
    pub uv: [f32; 2],
    /// RGBA vertex color from the voxel type's appearance.
    pub color: [f32; 4],
}

/// A merged rectangle of same-type voxel faces, the atomic mesh primitive.
///
/// The mesher emits quads; triangulation order (two triangles per quad) is
/// decided at emission so that winding faces outward.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quad {
    /// The four corner positions in chunk-local voxel units, wound
    /// counterclockwise as seen from outside for a positive-direction
    /// face.
    pub corners: [[f32; 3]; 4],
    /// The single outward normal shared by the whole rectangle.
    pub normal: [f32; 3],
    /// The single color shared by the whole rectangle.
    pub color: [f32; 4],
    /// UV extent `[width, height]` of the rectangle in voxel units.
    pub uv_extent: [f32; 2],
    /// The voxel type the rectangle was merged from.
    pub voxel: VoxelType,
    /// The cube face this quad covers.
    pub face: Face,
}

impl Quad {
    /// Builds the quad for a merged mask rectangle.
    ///
    /// # Arguments
    /// * `face` - The sweep face (axis and direction)
    /// * `slice` - The voxel layer index along the face's axis
    /// * `u`, `v` - The rectangle origin on the slice's two free axes
    /// * `width`, `height` - The rectangle extents along those axes
    /// * `voxel` - The merged voxel type
    pub fn new(
        face: Face,
        slice: usize,
        u: usize,
        v: usize,
        width: usize,
        height: usize,
        voxel: VoxelType,
    ) -> Self {
        let axis = face.axis();
        let u_axis = (axis + 1) % 3;
        let v_axis = (axis + 2) % 3;

        // The emitted plane sits on the far side of the voxel layer for a
        // positive face and the near side for a negative face.
        let plane = if face.is_positive() { slice + 1 } else { slice };

        let mut base = [0.0f32; 3];
        base[axis] = plane as f32;
        base[u_axis] = u as f32;
        base[v_axis] = v as f32;

        let mut du = [0.0f32; 3];
        du[u_axis] = width as f32;
        let mut dv = [0.0f32; 3];
        dv[v_axis] = height as f32;

        let corners = [
            base,
            add3(base, du),
            add3(add3(base, du), dv),
            add3(base, dv),
        ];

        Quad {
            corners,
            normal: face.normal(),
            color: voxel.color(),
            uv_extent: [width as f32, height as f32],
            voxel,
            face,
        }
    }
}

fn add3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Caller-owned mesh output streams, reused across chunks.
///
/// [`mesh_chunk`] clears and refills these; holding one per meshing
/// context avoids reallocating for every chunk.
#[derive(Clone, Debug, Default)]
pub struct MeshBuffers {
    /// Vertex positions in chunk-local voxel units, four per quad.
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex normals.
    pub normals: Vec<[f32; 3]>,
    /// Per-vertex texture coordinates.
    pub uvs: Vec<[f32; 2]>,
    /// Per-vertex RGBA colors.
    pub colors: Vec<[f32; 4]>,
    /// Triangle indices, six per quad.
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    /// Creates empty buffers.
    pub fn new() -> Self {
        MeshBuffers::default()
    }

    /// Empties every stream while keeping their allocations.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.colors.clear();
        self.indices.clear();
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of emitted quads.
    pub fn quad_count(&self) -> usize {
        self.positions.len() / 4
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Appends a quad: four vertices and two triangles, with the index
    /// winding flipped for negative-direction faces so the triangles face
    /// outward.
    pub fn push_quad(&mut self, quad: &Quad) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&quad.corners);
        for _ in 0..4 {
            self.normals.push(quad.normal);
            self.colors.push(quad.color);
        }
        let [w, h] = quad.uv_extent;
        self.uvs
            .extend_from_slice(&[[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]]);

        let winding: [u32; 6] = if quad.face.is_positive() {
            [0, 1, 2, 0, 2, 3]
        } else {
            [0, 2, 1, 0, 3, 2]
        };
        self.indices.extend(winding.iter().map(|offset| base + offset));
    }

    /// Packs the separate streams into one interleaved `Pod` vertex stream
    /// for direct GPU upload.
    pub fn interleaved(&self) -> Vec<Vertex> {
        (0..self.positions.len())
            .map(|i| Vertex {
                position: self.positions[i],
                normal: self.normals[i],
                uv: self.uvs[i],
                color: self.colors[i],
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_corners_span_the_rectangle() {
        // Top face (+Y, axis 1): u axis is Z, v axis is X.
        let quad = Quad::new(Face::Top, 0, 0, 0, 3, 2, VoxelType::Grass);
        assert_eq!(quad.normal, [0.0, 1.0, 0.0]);
        assert_eq!(quad.uv_extent, [3.0, 2.0]);
        // All corners sit on the plane above layer 0.
        for corner in quad.corners {
            assert_eq!(corner[1], 1.0);
        }
        assert_eq!(quad.corners[0], [0.0, 1.0, 0.0]);
        assert_eq!(quad.corners[2], [2.0, 1.0, 3.0]);
    }

    #[test]
    fn negative_face_plane_sits_on_the_near_side() {
        let quad = Quad::new(Face::Bottom, 0, 0, 0, 1, 1, VoxelType::Stone);
        for corner in quad.corners {
            assert_eq!(corner[1], 0.0);
        }
        assert_eq!(quad.normal, [0.0, -1.0, 0.0]);
    }

    #[test]
    fn push_quad_extends_every_stream() {
        let mut buffers = MeshBuffers::new();
        let quad = Quad::new(Face::Front, 4, 1, 2, 2, 2, VoxelType::Dirt);
        buffers.push_quad(&quad);

        assert_eq!(buffers.vertex_count(), 4);
        assert_eq!(buffers.quad_count(), 1);
        assert_eq!(buffers.triangle_count(), 2);
        assert_eq!(buffers.normals.len(), 4);
        assert_eq!(buffers.uvs.len(), 4);
        assert_eq!(buffers.colors.len(), 4);
        assert_eq!(buffers.indices.len(), 6);
        assert!(buffers.indices.iter().all(|&i| i < 4));
    }

    #[test]
    fn winding_flips_with_direction() {
        let mut buffers = MeshBuffers::new();
        buffers.push_quad(&Quad::new(Face::Right, 0, 0, 0, 1, 1, VoxelType::Stone));
        buffers.push_quad(&Quad::new(Face::Left, 0, 0, 0, 1, 1, VoxelType::Stone));
        assert_eq!(&buffers.indices[..6], &[0, 1, 2, 0, 2, 3]);
        assert_eq!(&buffers.indices[6..], &[4, 6, 5, 4, 7, 6]);
    }

    #[test]
    fn clear_keeps_allocations() {
        let mut buffers = MeshBuffers::new();
        buffers.push_quad(&Quad::new(Face::Top, 0, 0, 0, 1, 1, VoxelType::Grass));
        let capacity = buffers.positions.capacity();
        buffers.clear();
        assert!(buffers.is_empty());
        assert_eq!(buffers.positions.capacity(), capacity);
    }

    #[test]
    fn interleaved_packs_matching_attributes() {
        let mut buffers = MeshBuffers::new();
        let quad = Quad::new(Face::Top, 2, 1, 1, 2, 1, VoxelType::Sand);
        buffers.push_quad(&quad);

        let packed = buffers.interleaved();
        assert_eq!(packed.len(), 4);
        for (i, vertex) in packed.iter().enumerate() {
            assert_eq!(vertex.position, buffers.positions[i]);
            assert_eq!(vertex.normal, quad.normal);
            assert_eq!(vertex.color, VoxelType::Sand.color());
        }
        assert_eq!(std::mem::size_of::<Vertex>(), 48);
    }
}
