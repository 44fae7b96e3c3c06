//! # Chunk Generators
//!
//! The generator contract consumed by the chunk lifecycle manager, plus a
//! set of concrete generators: a Perlin-noise heightmap terrain for real
//! worlds and uniform/checkerboard/scatter patterns for tests and demos.
//!
//! Every generator fills the voxel array in flatten order
//! (`x + y * size + z * size²`, `x` fastest) and is deterministic for a
//! fixed seed and coordinate.

use noise::{NoiseFn, Perlin};

use crate::coords::ChunkCoord;
use crate::error::GenerationError;
use crate::voxel::VoxelType;

/// Produces the voxel contents of a chunk.
///
/// Implementations must return exactly `chunk_size³` voxels in flatten
/// order and be deterministic for a fixed seed and coordinate. A failure
/// for one chunk is isolated by the lifecycle manager: the chunk stays
/// unloaded and a later load request retries it.
pub trait ChunkGenerator {
    /// Generates the voxel array for the chunk at `coord`.
    fn generate(
        &self,
        coord: ChunkCoord,
        chunk_size: usize,
    ) -> Result<Vec<VoxelType>, GenerationError>;
}

/// Scaling factor applied to world coordinates when sampling the
/// heightmap noise.
const HEIGHT_NOISE_SCALE: f64 = 0.02;

/// Heightmap terrain from 2D Perlin noise.
///
/// Each column's surface height comes from one noise sample; the column is
/// then banded into grass (or sand near the water level), a few voxels of
/// dirt, and stone below, with water filling air below the sea level.
pub struct PerlinHeightmapGenerator {
    perlin: Perlin,
    /// Maximum surface displacement in voxels.
    amplitude: f64,
    /// Global voxel Y of the water surface.
    sea_level: i32,
    /// Voxels of dirt between the surface and the stone below.
    dirt_depth: i32,
}

impl PerlinHeightmapGenerator {
    /// Creates a generator with the default terrain shape for a seed.
    pub fn new(seed: u32) -> Self {
        PerlinHeightmapGenerator {
            perlin: Perlin::new(seed),
            amplitude: 24.0,
            sea_level: -2,
            dirt_depth: 3,
        }
    }

    /// Surface height of the column at a global voxel (x, z).
    fn surface_height(&self, x: i32, z: i32) -> i32 {
        let sample = self.perlin.get([
            x as f64 * HEIGHT_NOISE_SCALE,
            z as f64 * HEIGHT_NOISE_SCALE,
        ]);
        (sample * self.amplitude).floor() as i32
    }

    /// The voxel for one global position given its column's surface height.
    fn voxel_for(&self, y: i32, surface: i32) -> VoxelType {
        if y > surface {
            if y <= self.sea_level {
                VoxelType::Water
            } else {
                VoxelType::Air
            }
        } else if y == surface {
            if surface <= self.sea_level + 1 {
                VoxelType::Sand
            } else {
                VoxelType::Grass
            }
        } else if y >= surface - self.dirt_depth {
            VoxelType::Dirt
        } else {
            VoxelType::Stone
        }
    }
}

impl ChunkGenerator for PerlinHeightmapGenerator {
    fn generate(
        &self,
        coord: ChunkCoord,
        chunk_size: usize,
    ) -> Result<Vec<VoxelType>, GenerationError> {
        let size = chunk_size as i32;
        let mut voxels = Vec::with_capacity(chunk_size * chunk_size * chunk_size);

        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    let gx = coord.x * size + x;
                    let gy = coord.y * size + y;
                    let gz = coord.z * size + z;
                    let surface = self.surface_height(gx, gz);
                    voxels.push(self.voxel_for(gy, surface));
                }
            }
        }
        Ok(voxels)
    }
}

/// Fills every voxel with the same type. `VoxelType::Air` gives empty
/// chunks; any solid type gives solid chunks. Mostly useful in tests.
pub struct UniformGenerator {
    voxel: VoxelType,
}

impl UniformGenerator {
    /// Creates a generator that fills chunks with `voxel`.
    pub fn new(voxel: VoxelType) -> Self {
        UniformGenerator { voxel }
    }
}

impl ChunkGenerator for UniformGenerator {
    fn generate(
        &self,
        _coord: ChunkCoord,
        chunk_size: usize,
    ) -> Result<Vec<VoxelType>, GenerationError> {
        Ok(vec![self.voxel; chunk_size * chunk_size * chunk_size])
    }
}

/// Alternates two voxel types on global parity, producing a period-1
/// checkerboard that is seamless across chunks.
pub struct CheckerboardGenerator {
    primary: VoxelType,
    secondary: VoxelType,
}

impl CheckerboardGenerator {
    /// Creates a checkerboard of `primary` and `secondary` voxels; either
    /// may be air.
    pub fn new(primary: VoxelType, secondary: VoxelType) -> Self {
        CheckerboardGenerator { primary, secondary }
    }
}

impl ChunkGenerator for CheckerboardGenerator {
    fn generate(
        &self,
        coord: ChunkCoord,
        chunk_size: usize,
    ) -> Result<Vec<VoxelType>, GenerationError> {
        let size = chunk_size as i32;
        let mut voxels = Vec::with_capacity(chunk_size * chunk_size * chunk_size);
        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    let gx = coord.x * size + x;
                    let gy = coord.y * size + y;
                    let gz = coord.z * size + z;
                    if (gx + gy + gz).rem_euclid(2) == 0 {
                        voxels.push(self.primary);
                    } else {
                        voxels.push(self.secondary);
                    }
                }
            }
        }
        Ok(voxels)
    }
}

/// Scatters a voxel type at a given density using a seeded RNG.
///
/// The RNG is re-seeded per chunk from the generator seed and the chunk
/// coordinate, so the same (seed, coordinate) pair always produces the
/// same chunk regardless of generation order.
pub struct ScatterGenerator {
    voxel: VoxelType,
    density: f64,
    seed: u64,
}

impl ScatterGenerator {
    /// Creates a scatter generator placing `voxel` with probability
    /// `density` per cell.
    pub fn new(voxel: VoxelType, density: f64, seed: u64) -> Self {
        ScatterGenerator {
            voxel,
            density,
            seed,
        }
    }

    /// Mixes the chunk coordinate into the seed.
    fn chunk_seed(&self, coord: ChunkCoord) -> u64 {
        let mut hash = self.seed;
        for component in [coord.x, coord.y, coord.z] {
            hash ^= component as u64;
            hash = hash.wrapping_mul(0x100_0000_01b3);
        }
        hash
    }
}

impl ChunkGenerator for ScatterGenerator {
    fn generate(
        &self,
        coord: ChunkCoord,
        chunk_size: usize,
    ) -> Result<Vec<VoxelType>, GenerationError> {
        let mut rng = fastrand::Rng::with_seed(self.chunk_seed(coord));
        let count = chunk_size * chunk_size * chunk_size;
        let mut voxels = Vec::with_capacity(count);
        for _ in 0..count {
            if rng.f64() < self.density {
                voxels.push(self.voxel);
            } else {
                voxels.push(VoxelType::Air);
            }
        }
        Ok(voxels)
    }
}
