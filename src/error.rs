//! Error types for configuration validation and chunk generation.

use thiserror::Error;

use crate::coords::ChunkCoord;

/// A configuration value rejected at construction time.
///
/// These are caller contract violations detected eagerly by
/// [`TerrainConfig::validate`](crate::config::TerrainConfig::validate)
/// rather than deferred to first use.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Chunk size must be at least one voxel per edge.
    #[error("chunk size must be positive, got {0}")]
    InvalidChunkSize(usize),

    /// Voxel size must be a positive number of world units.
    #[error("voxel size must be positive, got {0}")]
    InvalidVoxelSize(f32),

    /// The unload radius must strictly exceed the load radius so that a
    /// hysteresis band exists between them.
    #[error("unload radius ({unload}) must exceed load radius ({load})")]
    InvalidRadii {
        /// Configured load radius in chunks.
        load: i32,
        /// Configured unload radius in chunks.
        unload: i32,
    },

    /// The cache capacity is below the minimum for an enabled cache.
    #[error("cache capacity must be at least 1 when caching is enabled")]
    InvalidCacheCapacity,

    /// A serialized configuration could not be parsed.
    #[error("invalid configuration JSON: {0}")]
    Parse(String),
}

/// A failure reported by a [`ChunkGenerator`](crate::world::ChunkGenerator)
/// for a single chunk.
///
/// Generation failures are isolated per chunk: the lifecycle manager logs
/// them, leaves the coordinate unloaded, and keeps processing the rest of
/// the queue. A later load request retries the coordinate.
#[derive(Debug, Clone, Error)]
#[error("chunk generation failed at {coord:?}: {message}")]
pub struct GenerationError {
    /// Coordinate of the chunk that failed to generate.
    pub coord: ChunkCoord,
    /// Human-readable description of the failure.
    pub message: String,
}

impl GenerationError {
    /// Creates a generation error for the given coordinate.
    pub fn new(coord: ChunkCoord, message: impl Into<String>) -> Self {
        GenerationError {
            coord,
            message: message.into(),
        }
    }
}
