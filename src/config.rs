//! # Terrain Configuration
//!
//! An immutable configuration struct validated at construction time.
//! Every tunable of the terrain core lives here: chunk geometry, streaming
//! radii, per-tick budgets, and cache sizing. Configurations can be built
//! in code or deserialized from JSON.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The shape of the streamed chunk region around the observer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamingTopology {
    /// Load a full 3D sphere of chunks around the observer.
    Spherical,

    /// Load a flat 2D disc of chunks at a single fixed chunk-Y level.
    ///
    /// Used for flat-terrain worlds where vertical streaming is wasted
    /// work. Distance comparisons ignore the Y axis.
    Flat {
        /// The fixed chunk-Y level of every streamed chunk.
        y: i32,
    },
}

/// Configuration for the terrain core.
///
/// Validated eagerly by [`validate`](TerrainConfig::validate); the
/// lifecycle manager and streamer both refuse to construct from an invalid
/// configuration rather than failing at first use.
///
/// # Examples
///
/// ```
/// use voxel_terrain::config::TerrainConfig;
///
/// let config = TerrainConfig {
///     load_radius: 3,
///     unload_radius: 5,
///     ..TerrainConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Voxels per chunk edge. A power of two keeps the local-coordinate
    /// modulo cheap, but any positive size is accepted.
    pub chunk_size: usize,

    /// World units per voxel.
    pub voxel_size: f32,

    /// Chunks within this radius of the observer are loaded.
    pub load_radius: i32,

    /// Chunks beyond this radius are unloaded. Must exceed `load_radius`;
    /// the gap is the hysteresis band that prevents load/unload thrashing
    /// at the boundary.
    pub unload_radius: i32,

    /// Maximum chunks generated per call to
    /// [`process_generation_queue`](crate::world::ChunkManager::process_generation_queue).
    pub max_generated_per_tick: usize,

    /// Wall-clock budget in milliseconds per call to
    /// [`process_meshing_queue`](crate::world::ChunkManager::process_meshing_queue).
    /// Advisory: a chunk already being meshed always finishes.
    pub max_meshing_millis: u64,

    /// Capacity of the unloaded-chunk LRU cache.
    pub cache_capacity: usize,

    /// Whether unloaded chunks are cached for reuse. When disabled,
    /// unloaded chunks are discarded and re-entry regenerates them.
    pub caching_enabled: bool,

    /// Streamed region shape.
    pub topology: StreamingTopology,

    /// Minimum interval in milliseconds between streamer updates.
    pub update_interval_millis: u64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            chunk_size: 16,
            voxel_size: 1.0,
            load_radius: 4,
            unload_radius: 6,
            max_generated_per_tick: 4,
            max_meshing_millis: 8,
            cache_capacity: 512,
            caching_enabled: true,
            topology: StreamingTopology::Spherical,
            update_interval_millis: 200,
        }
    }
}

impl TerrainConfig {
    /// Checks every configuration invariant.
    ///
    /// # Returns
    /// `Ok(())` for a usable configuration, or the first violated
    /// constraint as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize(self.chunk_size));
        }
        if !(self.voxel_size > 0.0) {
            return Err(ConfigError::InvalidVoxelSize(self.voxel_size));
        }
        if self.load_radius < 0 || self.unload_radius <= self.load_radius {
            return Err(ConfigError::InvalidRadii {
                load: self.load_radius,
                unload: self.unload_radius,
            });
        }
        if self.caching_enabled && self.cache_capacity == 0 {
            return Err(ConfigError::InvalidCacheCapacity);
        }
        Ok(())
    }

    /// Parses and validates a configuration from a JSON string.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: TerrainConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Total voxels in one chunk (`chunk_size³`).
    pub fn voxels_per_chunk(&self) -> usize {
        self.chunk_size * self.chunk_size * self.chunk_size
    }

    /// The meshing budget as a [`Duration`].
    pub fn meshing_budget(&self) -> Duration {
        Duration::from_millis(self.max_meshing_millis)
    }

    /// The streamer update interval as a [`Duration`].
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(TerrainConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_chunk_size_rejected() {
        let config = TerrainConfig {
            chunk_size: 0,
            ..TerrainConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidChunkSize(0)));
    }

    #[test]
    fn non_positive_voxel_size_rejected() {
        let config = TerrainConfig {
            voxel_size: 0.0,
            ..TerrainConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidVoxelSize(_))
        ));
    }

    #[test]
    fn unload_radius_must_exceed_load_radius() {
        let config = TerrainConfig {
            load_radius: 4,
            unload_radius: 4,
            ..TerrainConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidRadii { load: 4, unload: 4 })
        );
    }

    #[test]
    fn negative_load_radius_rejected() {
        let config = TerrainConfig {
            load_radius: -1,
            unload_radius: 2,
            ..TerrainConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRadii { .. })));
    }

    #[test]
    fn zero_capacity_only_rejected_when_caching_enabled() {
        let mut config = TerrainConfig {
            cache_capacity: 0,
            ..TerrainConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidCacheCapacity));

        config.caching_enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_round_trip() {
        let config = TerrainConfig {
            topology: StreamingTopology::Flat { y: 2 },
            ..TerrainConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed = TerrainConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let parsed = TerrainConfig::from_json_str(r#"{"chunk_size": 32}"#).unwrap();
        assert_eq!(parsed.chunk_size, 32);
        assert_eq!(parsed.load_radius, TerrainConfig::default().load_radius);
    }

    #[test]
    fn invalid_json_config_rejected() {
        assert!(TerrainConfig::from_json_str(r#"{"unload_radius": 1}"#).is_err());
    }
}
