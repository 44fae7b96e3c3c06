//! # Terrain Streamer
//!
//! Tracks an observer position and keeps the lifecycle manager's chunk set
//! consistent with it: chunks within the load radius are requested, chunks
//! beyond the unload radius are released. The gap between the two radii is
//! the hysteresis band that keeps a chunk near the boundary from being
//! loaded and unloaded over and over as the observer jitters in place.
//!
//! Updates are rate-limited by a configurable interval and short-circuited
//! when the observer has not crossed into a new chunk, so calling
//! [`update`](TerrainStreamer::update) every frame is cheap.

use cgmath::{Point3, Vector3};
use log::debug;
use web_time::Instant;

use crate::config::{StreamingTopology, TerrainConfig};
use crate::coords::{self, ChunkCoord};
use crate::error::ConfigError;

use super::{ChunkGenerator, ChunkManager, MeshConsumer};

/// Streams chunks in and out around a moving observer.
pub struct TerrainStreamer {
    chunk_size: usize,
    voxel_size: f32,
    load_radius: i32,
    unload_radius: i32,
    topology: StreamingTopology,
    update_interval: std::time::Duration,
    observer: Point3<f32>,
    observer_chunk: Option<ChunkCoord>,
    last_update: Option<Instant>,
}

impl TerrainStreamer {
    /// Creates a streamer from a validated configuration, with the
    /// observer at the world origin.
    pub fn new(config: &TerrainConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(TerrainStreamer {
            chunk_size: config.chunk_size,
            voxel_size: config.voxel_size,
            load_radius: config.load_radius,
            unload_radius: config.unload_radius,
            topology: config.topology,
            update_interval: config.update_interval(),
            observer: Point3::new(0.0, 0.0, 0.0),
            observer_chunk: None,
            last_update: None,
        })
    }

    /// Moves the observer. Takes effect on the next [`update`](TerrainStreamer::update).
    pub fn set_observer(&mut self, position: Point3<f32>) {
        self.observer = position;
    }

    /// The observer's current world position.
    pub fn observer(&self) -> Point3<f32> {
        self.observer
    }

    /// The chunk the observer currently occupies.
    pub fn observer_chunk(&self) -> ChunkCoord {
        coords::world_to_chunk(self.observer, self.chunk_size, self.voxel_size)
    }

    /// Reconciles the manager's chunk set with the observer position.
    ///
    /// Skipped (returning `false`) when the update interval has not
    /// elapsed or the observer is still in the same chunk as last time;
    /// `force` bypasses both checks. When a scan runs, every chunk
    /// coordinate within the load radius is requested and every active
    /// chunk beyond the unload radius is unloaded, both compared by
    /// squared distance.
    ///
    /// # Returns
    /// Whether a scan ran.
    pub fn update<G: ChunkGenerator, C: MeshConsumer>(
        &mut self,
        manager: &mut ChunkManager<G>,
        consumer: &mut C,
        force: bool,
    ) -> bool {
        let now = Instant::now();
        if !force {
            if let Some(last) = self.last_update {
                if now.duration_since(last) < self.update_interval {
                    return false;
                }
            }
        }

        let center = self.observer_chunk();
        if !force && self.observer_chunk == Some(center) {
            self.last_update = Some(now);
            return false;
        }

        let loaded = self.load_in_radius(center, manager);
        let unloaded = self.unload_beyond_radius(center, manager, consumer);
        debug!(
            "streamer scan at {center:?}: {loaded} load requests, {unloaded} unloads, {} active",
            manager.active_count()
        );

        self.observer_chunk = Some(center);
        self.last_update = Some(now);
        true
    }

    /// Requests every chunk within the load radius of `center`.
    fn load_in_radius<G: ChunkGenerator>(
        &self,
        center: ChunkCoord,
        manager: &mut ChunkManager<G>,
    ) -> usize {
        let r = self.load_radius;
        let r_sq = (r as i64) * (r as i64);
        let mut requested = 0;

        match self.topology {
            StreamingTopology::Spherical => {
                for dx in -r..=r {
                    for dy in -r..=r {
                        for dz in -r..=r {
                            let offset = Vector3::new(dx, dy, dz);
                            let coord = center + offset;
                            if coords::squared_distance(coord, center) <= r_sq
                                && !manager.is_loaded(coord)
                            {
                                manager.request_load(coord);
                                requested += 1;
                            }
                        }
                    }
                }
            }
            StreamingTopology::Flat { y } => {
                for dx in -r..=r {
                    for dz in -r..=r {
                        let coord = Point3::new(center.x + dx, y, center.z + dz);
                        let d_sq = (dx as i64) * (dx as i64) + (dz as i64) * (dz as i64);
                        if d_sq <= r_sq && !manager.is_loaded(coord) {
                            manager.request_load(coord);
                            requested += 1;
                        }
                    }
                }
            }
        }
        requested
    }

    /// Unloads every active chunk farther than the unload radius from
    /// `center`.
    fn unload_beyond_radius<G: ChunkGenerator, C: MeshConsumer>(
        &self,
        center: ChunkCoord,
        manager: &mut ChunkManager<G>,
        consumer: &mut C,
    ) -> usize {
        let r_sq = (self.unload_radius as i64) * (self.unload_radius as i64);
        let too_far: Vec<ChunkCoord> = manager
            .active_coords()
            .filter(|&coord| self.streaming_distance_sq(coord, center) > r_sq)
            .collect();
        for coord in &too_far {
            manager.request_unload(*coord, consumer);
        }
        too_far.len()
    }

    /// Squared chunk distance under the configured topology: flat worlds
    /// measure in the XZ plane only.
    fn streaming_distance_sq(&self, coord: ChunkCoord, center: ChunkCoord) -> i64 {
        match self.topology {
            StreamingTopology::Spherical => coords::squared_distance(coord, center),
            StreamingTopology::Flat { .. } => {
                let dx = (coord.x - center.x) as i64;
                let dz = (coord.z - center.z) as i64;
                dx * dx + dz * dz
            }
        }
    }
}
