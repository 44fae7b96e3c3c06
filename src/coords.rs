//! # Coordinate Math
//!
//! Pure conversion functions between the three coordinate spaces of the
//! terrain core:
//!
//! * **world space** - continuous positions in world units (`Point3<f32>`)
//! * **voxel space** - integer global voxel coordinates
//! * **chunk space** - integer chunk coordinates ([`ChunkCoord`])
//!
//! plus the flatten/unflatten mapping between a chunk-local `(x, y, z)`
//! triple and the index into a chunk's dense voxel array.
//!
//! ## Negative coordinates
//!
//! All chunk/local conversions use Euclidean division and remainder
//! (`div_euclid`/`rem_euclid`). A naive truncating `%` would map the global
//! voxel coordinate `-1` to local `-1`; the Euclidean form maps it to
//! `chunk_size - 1`, which is what every consumer of a local coordinate
//! expects.
//!
//! ## Index ordering
//!
//! The flattened index is `x + y * size + z * size * size`, so `x` varies
//! fastest and `z` slowest. Generators and the mesher both rely on this
//! exact ordering.

use cgmath::Point3;

/// A chunk's position in chunk space (not voxel space).
///
/// Chunk coordinates are the primary key of the active chunk map and the
/// LRU cache; `cgmath` supplies the equality, hashing, and vector
/// arithmetic they need.
pub type ChunkCoord = Point3<i32>;

/// Converts a world-space position to the coordinate of the chunk
/// containing it.
///
/// # Arguments
/// * `pos` - The world-space position
/// * `chunk_size` - Voxels per chunk edge
/// * `voxel_size` - World units per voxel
pub fn world_to_chunk(pos: Point3<f32>, chunk_size: usize, voxel_size: f32) -> ChunkCoord {
    let extent = chunk_size as f32 * voxel_size;
    Point3::new(
        (pos.x / extent).floor() as i32,
        (pos.y / extent).floor() as i32,
        (pos.z / extent).floor() as i32,
    )
}

/// Converts a world-space position to a global voxel coordinate.
pub fn world_to_voxel(pos: Point3<f32>, voxel_size: f32) -> Point3<i32> {
    Point3::new(
        (pos.x / voxel_size).floor() as i32,
        (pos.y / voxel_size).floor() as i32,
        (pos.z / voxel_size).floor() as i32,
    )
}

/// Converts a global voxel coordinate to the coordinate of the chunk
/// containing it.
pub fn voxel_to_chunk(voxel: Point3<i32>, chunk_size: usize) -> ChunkCoord {
    let size = chunk_size as i32;
    Point3::new(
        voxel.x.div_euclid(size),
        voxel.y.div_euclid(size),
        voxel.z.div_euclid(size),
    )
}

/// Converts a global voxel coordinate to its chunk-local coordinate.
///
/// Each component is in `[0, chunk_size)` even for negative input; the
/// global voxel `-1` maps to local `chunk_size - 1`.
pub fn voxel_to_local(voxel: Point3<i32>, chunk_size: usize) -> Point3<usize> {
    let size = chunk_size as i32;
    Point3::new(
        voxel.x.rem_euclid(size) as usize,
        voxel.y.rem_euclid(size) as usize,
        voxel.z.rem_euclid(size) as usize,
    )
}

/// Returns the world-space position of a chunk's minimum corner.
pub fn chunk_origin_world(coord: ChunkCoord, chunk_size: usize, voxel_size: f32) -> Point3<f32> {
    let extent = chunk_size as f32 * voxel_size;
    Point3::new(
        coord.x as f32 * extent,
        coord.y as f32 * extent,
        coord.z as f32 * extent,
    )
}

/// Flattens a chunk-local `(x, y, z)` coordinate into an index into the
/// dense voxel array.
///
/// The ordering is `x + y * size + z * size * size` (`x` fastest, `z`
/// slowest). All arithmetic is exact integer arithmetic.
///
/// # Panics
/// In debug builds, panics if any coordinate is out of bounds or
/// `chunk_size` is zero; both indicate a caller bug.
pub fn flatten(x: usize, y: usize, z: usize, chunk_size: usize) -> usize {
    debug_assert!(chunk_size > 0, "chunk size must be positive");
    debug_assert!(
        x < chunk_size && y < chunk_size && z < chunk_size,
        "local coordinate ({x}, {y}, {z}) out of bounds for chunk size {chunk_size}"
    );
    x + y * chunk_size + z * chunk_size * chunk_size
}

/// Inverts [`flatten`]: recovers the `(x, y, z)` triple from an array index.
///
/// # Panics
/// In debug builds, panics if `index` is outside `[0, chunk_size³)`.
pub fn unflatten(index: usize, chunk_size: usize) -> (usize, usize, usize) {
    debug_assert!(chunk_size > 0, "chunk size must be positive");
    debug_assert!(
        index < chunk_size * chunk_size * chunk_size,
        "index {index} out of bounds for chunk size {chunk_size}"
    );
    (
        index % chunk_size,
        (index / chunk_size) % chunk_size,
        index / (chunk_size * chunk_size),
    )
}

/// Whether a signed local coordinate lies inside a chunk of the given size.
pub fn in_bounds(x: i32, y: i32, z: i32, chunk_size: usize) -> bool {
    let size = chunk_size as i32;
    x >= 0 && x < size && y >= 0 && y < size && z >= 0 && z < size
}

/// Manhattan distance between two chunk coordinates.
pub fn manhattan_distance(a: ChunkCoord, b: ChunkCoord) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs() + (a.z - b.z).abs()
}

/// Squared Euclidean distance between two chunk coordinates.
///
/// Used for radius comparisons (compare against the squared radius), which
/// avoids the square root entirely. The accumulator is `i64` so large
/// coordinates cannot overflow.
pub fn squared_distance(a: ChunkCoord, b: ChunkCoord) -> i64 {
    let dx = (a.x - b.x) as i64;
    let dy = (a.y - b.y) as i64;
    let dz = (a.z - b.z) as i64;
    dx * dx + dy * dy + dz * dz
}
